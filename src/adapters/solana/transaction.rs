//! Legacy Solana transaction wire format, limited to what a single system
//! transfer needs.

use crate::adapters::solana::keypair::PoolKeypair;
use crate::adapters::solana::pubkey::{Pubkey, SYSTEM_PROGRAM_ID};

/// Index of `Transfer` in the system program's instruction enum.
const SYSTEM_TRANSFER: u32 = 2;

pub const SIGNATURE_BYTES: usize = 64;

/// Appends `value` as a compact-u16 (7 bits per byte, high bit = continuation).
pub fn encode_compact_u16(buf: &mut Vec<u8>, value: u16) {
    let mut rem = value;
    loop {
        let mut byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            buf.push(byte);
            return;
        }
        byte |= 0x80;
        buf.push(byte);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// A message with one system `Transfer` of `lamports` from `from` to `to`.
    ///
    /// `from` is the fee payer and only signer. A self-transfer lists the
    /// account once.
    pub fn system_transfer(from: &Pubkey, to: &Pubkey, lamports: u64, recent_blockhash: [u8; 32]) -> Self {
        let mut data = Vec::with_capacity(12);
        data.extend_from_slice(&SYSTEM_TRANSFER.to_le_bytes());
        data.extend_from_slice(&lamports.to_le_bytes());

        let (account_keys, accounts) = if from == to {
            (vec![*from, SYSTEM_PROGRAM_ID], vec![0, 0])
        } else {
            (vec![*from, *to, SYSTEM_PROGRAM_ID], vec![0, 1])
        };
        let program_id_index = (account_keys.len() - 1) as u8;

        Self {
            num_required_signatures: 1,
            num_readonly_signed_accounts: 0,
            num_readonly_unsigned_accounts: 1,
            account_keys,
            recent_blockhash,
            instructions: vec![CompiledInstruction {
                program_id_index,
                accounts,
                data,
            }],
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(160);
        buf.push(self.num_required_signatures);
        buf.push(self.num_readonly_signed_accounts);
        buf.push(self.num_readonly_unsigned_accounts);

        encode_compact_u16(&mut buf, self.account_keys.len() as u16);
        for key in &self.account_keys {
            buf.extend_from_slice(key.as_bytes());
        }

        buf.extend_from_slice(&self.recent_blockhash);

        encode_compact_u16(&mut buf, self.instructions.len() as u16);
        for ix in &self.instructions {
            buf.push(ix.program_id_index);
            encode_compact_u16(&mut buf, ix.accounts.len() as u16);
            buf.extend_from_slice(&ix.accounts);
            encode_compact_u16(&mut buf, ix.data.len() as u16);
            buf.extend_from_slice(&ix.data);
        }

        buf
    }
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub signatures: Vec<[u8; SIGNATURE_BYTES]>,
    pub message: Message,
}

impl Transaction {
    pub fn new_signed(message: Message, payer: &PoolKeypair) -> Self {
        let signature = payer.sign(&message.serialize());
        Self {
            signatures: vec![signature],
            message,
        }
    }

    /// The first signature identifies the transaction on chain.
    pub fn signature(&self) -> Option<String> {
        self.signatures
            .first()
            .map(|sig| bs58::encode(sig).into_string())
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_compact_u16(&mut buf, self.signatures.len() as u16);
        for sig in &self.signatures {
            buf.extend_from_slice(sig);
        }
        buf.extend_from_slice(&self.message.serialize());
        buf
    }
}
