//! Legacy transaction messages: account compilation and the wire format.

use ed25519_dalek::Verifier;

use crate::pubkey::Hash;
use crate::pubkey::Pubkey;
use crate::pubkey::Signature;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("{0} is not a required signer of this message")]
    NotASigner(Pubkey),
    #[error("missing signature for {0}")]
    MissingSignature(Pubkey),
    #[error("invalid signature for {0}")]
    InvalidSignature(Pubkey),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn new_readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// A single program invocation before it is compiled into a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

/// An instruction whose accounts are indexes into the message's key table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: Hash,
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Compiles instructions into a message paid for by `payer`.
    ///
    /// Keys are ordered writable signers, readonly signers, writable
    /// non-signers, then readonly non-signers, with the payer first.
    pub fn new(instructions: &[Instruction], payer: &Pubkey, recent_blockhash: Hash) -> Self {
        let mut metas = vec![AccountMeta::new(*payer, true)];
        let mut merge = |meta: &AccountMeta| {
            match metas.iter_mut().find(|m| m.pubkey == meta.pubkey) {
                Some(existing) => {
                    existing.is_signer |= meta.is_signer;
                    existing.is_writable |= meta.is_writable;
                }
                None => metas.push(meta.clone()),
            }
        };
        for instruction in instructions {
            instruction.accounts.iter().for_each(&mut merge);
            merge(&AccountMeta::new_readonly(instruction.program_id, false));
        }
        // stable: first-seen order is kept within each group
        metas.sort_by_key(|m| (!m.is_signer, !m.is_writable));

        let count = |signer: bool, writable: bool| {
            metas
                .iter()
                .filter(|m| m.is_signer == signer && m.is_writable == writable)
                .count() as u8
        };
        let header = MessageHeader {
            num_required_signatures: metas.iter().filter(|m| m.is_signer).count() as u8,
            num_readonly_signed_accounts: count(true, false),
            num_readonly_unsigned_accounts: count(false, false),
        };
        let account_keys: Vec<Pubkey> = metas.into_iter().map(|m| m.pubkey).collect();

        let index_of = |key: &Pubkey| {
            account_keys
                .iter()
                .position(|k| k == key)
                .map(|i| i as u8)
                .unwrap_or_default()
        };
        let instructions = instructions
            .iter()
            .map(|ix| CompiledInstruction {
                program_id_index: index_of(&ix.program_id),
                accounts: ix.accounts.iter().map(|a| index_of(&a.pubkey)).collect(),
                data: ix.data.clone(),
            })
            .collect();

        Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        }
    }

    /// The keys whose signatures the message requires, in signature order.
    pub fn signer_keys(&self) -> &[Pubkey] {
        let n = usize::from(self.header.num_required_signatures).min(self.account_keys.len());
        &self.account_keys[..n]
    }

    /// The bytes every signer signs.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = vec![
            self.header.num_required_signatures,
            self.header.num_readonly_signed_accounts,
            self.header.num_readonly_unsigned_accounts,
        ];
        encode_length(&mut out, self.account_keys.len());
        for key in &self.account_keys {
            out.extend_from_slice(key.as_bytes());
        }
        out.extend_from_slice(self.recent_blockhash.as_bytes());
        encode_length(&mut out, self.instructions.len());
        for ix in &self.instructions {
            out.push(ix.program_id_index);
            encode_length(&mut out, ix.accounts.len());
            out.extend_from_slice(&ix.accounts);
            encode_length(&mut out, ix.data.len());
            out.extend_from_slice(&ix.data);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub signatures: Vec<Signature>,
    pub message: Message,
}

impl Transaction {
    /// A transaction with an empty signature slot per required signer.
    pub fn new_unsigned(message: Message) -> Self {
        let slots = message.signer_keys().len();
        Self {
            signatures: vec![Signature::default(); slots],
            message,
        }
    }

    pub fn add_signature(
        &mut self,
        signer: &Pubkey,
        signature: Signature,
    ) -> Result<(), TransactionError> {
        let slot = self
            .message
            .signer_keys()
            .iter()
            .position(|k| k == signer)
            .ok_or(TransactionError::NotASigner(*signer))?;
        self.signatures[slot] = signature;
        Ok(())
    }

    /// The transaction id, once the fee payer has signed.
    pub fn id(&self) -> Option<Signature> {
        self.signatures
            .first()
            .copied()
            .filter(|s| *s != Signature::default())
    }

    /// Checks every required signature against the message bytes.
    pub fn verify(&self) -> Result<(), TransactionError> {
        let bytes = self.message.serialize();
        for (key, signature) in self.message.signer_keys().iter().zip(&self.signatures) {
            if *signature == Signature::default() {
                return Err(TransactionError::MissingSignature(*key));
            }
            let verifying = ed25519_dalek::VerifyingKey::from_bytes(key.as_bytes())
                .map_err(|_| TransactionError::InvalidSignature(*key))?;
            let signature = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
            verifying
                .verify(&bytes, &signature)
                .map_err(|_| TransactionError::InvalidSignature(*key))?;
        }
        Ok(())
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        encode_length(&mut out, self.signatures.len());
        for signature in &self.signatures {
            out.extend_from_slice(signature.as_bytes());
        }
        out.extend_from_slice(&self.message.serialize());
        out
    }
}

/// Compact-u16 length prefix: 7 bits per byte, high bit set on all but the last.
fn encode_length(out: &mut Vec<u8>, mut len: usize) {
    loop {
        let byte = (len & 0x7f) as u8;
        len >>= 7;
        if len == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> Pubkey {
        Pubkey::new([n; 32])
    }

    #[test]
    fn compact_lengths() {
        let encode = |len| {
            let mut out = Vec::new();
            encode_length(&mut out, len);
            out
        };
        assert_eq!(encode(0), [0x00]);
        assert_eq!(encode(0x7f), [0x7f]);
        assert_eq!(encode(0x80), [0x80, 0x01]);
        assert_eq!(encode(0x3fff), [0xff, 0x7f]);
        assert_eq!(encode(0x4000), [0x80, 0x80, 0x01]);
    }

    #[test]
    fn orders_keys_by_signer_and_writability() {
        let program = key(9);
        let payer = key(1);
        let record = key(2);
        let ix = Instruction {
            program_id: program,
            accounts: vec![
                AccountMeta::new(record, true),
                AccountMeta::new(payer, true),
                AccountMeta::new_readonly(Pubkey::SYSTEM_PROGRAM, false),
            ],
            data: vec![1, 2, 3],
        };
        let message = Message::new(&[ix], &payer, Hash::default());

        assert_eq!(
            message.account_keys,
            [payer, record, Pubkey::SYSTEM_PROGRAM, program]
        );
        assert_eq!(
            message.header,
            MessageHeader {
                num_required_signatures: 2,
                num_readonly_signed_accounts: 0,
                num_readonly_unsigned_accounts: 2,
            }
        );
        assert_eq!(message.instructions[0].program_id_index, 3);
        assert_eq!(message.instructions[0].accounts, [1, 0, 2]);
        assert_eq!(message.signer_keys(), [payer, record]);
    }

    #[test]
    fn merges_duplicate_accounts() {
        let payer = key(1);
        let ix = Instruction {
            program_id: key(9),
            accounts: vec![
                AccountMeta::new_readonly(key(3), false),
                AccountMeta::new(key(3), false),
            ],
            data: vec![],
        };
        let message = Message::new(&[ix], &payer, Hash::default());
        assert_eq!(message.account_keys, [payer, key(3), key(9)]);
        assert_eq!(message.header.num_readonly_unsigned_accounts, 1);
    }

    #[test]
    fn serialized_layout() {
        let payer = key(1);
        let ix = Instruction {
            program_id: key(9),
            accounts: vec![AccountMeta::new(payer, true)],
            data: vec![0xaa, 0xbb],
        };
        let message = Message::new(&[ix], &payer, Hash::new([7; 32]));
        let bytes = message.serialize();

        assert_eq!(&bytes[..4], [1, 0, 1, 2]);
        assert_eq!(&bytes[4..36], [1; 32]);
        assert_eq!(&bytes[36..68], [9; 32]);
        assert_eq!(&bytes[68..100], [7; 32]);
        assert_eq!(&bytes[100..], [1, 1, 1, 0, 2, 0xaa, 0xbb]);

        let tx = Transaction::new_unsigned(message);
        let wire = tx.serialize();
        assert_eq!(wire[0], 1);
        assert_eq!(wire.len(), 1 + 64 + bytes.len());
    }

    #[test]
    fn rejects_signature_from_non_signer() {
        let payer = key(1);
        let message = Message::new(&[], &payer, Hash::default());
        let mut tx = Transaction::new_unsigned(message);
        assert_eq!(
            tx.add_signature(&key(5), Signature::default()),
            Err(TransactionError::NotASigner(key(5)))
        );
        assert_eq!(tx.id(), None);
        assert_eq!(tx.verify(), Err(TransactionError::MissingSignature(payer)));
    }
}
