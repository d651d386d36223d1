//! Stable snapshot hashing for replay verification.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use super::*;

impl Session {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.tick);
        hasher.write_u8(match self.state {
            SessionState::Running => 0,
            SessionState::Won => 1,
            SessionState::Lost(LossCause::Captured) => 2,
            SessionState::Lost(LossCause::Timeout) => 3,
        });
        hasher.write_i32(self.player.pos.x);
        hasher.write_i32(self.player.pos.y);
        hasher.write_u32(self.player.pixel.x.to_bits());
        hasher.write_u32(self.player.pixel.y.to_bits());
        hasher.write_u8(u8::from(self.player.has_key));
        hasher.write_u8(self.player.dash.map_or(0, |direction| direction as u8 + 1));
        for hunter in self.hunters.values() {
            hasher.write_i32(hunter.pos.x);
            hasher.write_i32(hunter.pos.y);
            hasher.write_u32(hunter.pixel.x.to_bits());
            hasher.write_u32(hunter.pixel.y.to_bits());
        }
        for direction in &self.pending {
            hasher.write_u8(*direction as u8);
        }
        hasher.finish()
    }
}
