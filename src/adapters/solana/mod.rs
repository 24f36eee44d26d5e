pub mod keypair;
pub mod payout;
pub mod pubkey;
pub mod rpc;
pub mod transaction;

pub use keypair::PoolKeypair;
pub use payout::SolanaPayout;
pub use pubkey::{Pubkey, SYSTEM_PROGRAM_ID};
pub use rpc::{Commitment, RpcClient};

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Rounds down to whole lamports.
pub fn sol_to_lamports(sol: f64) -> u64 {
    (sol * LAMPORTS_PER_SOL as f64).floor() as u64
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}
