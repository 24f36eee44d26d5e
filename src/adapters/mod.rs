// Adapters layer: concrete implementations of the verifier and payment ports.

pub mod openai;
pub mod solana;

pub use openai::OpenAiVerifier;
pub use solana::SolanaPayout;
