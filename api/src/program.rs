//! Client side of the on-chain link program: instruction encoding and the
//! layout of the shared record account.
//!
//! The program uses 8-byte discriminators (the first bytes of
//! `sha256("<namespace>:<name>")`) followed by borsh-encoded fields, for both
//! instruction data and account data.

use borsh::BorshDeserialize;
use borsh::BorshSerialize;
use sha2::Digest;
use sha2::Sha256;

use crate::pubkey::Pubkey;
use crate::transaction::AccountMeta;
use crate::transaction::Instruction;

/// Program method that creates the shared record.
pub const INITIALIZE_METHOD: &str = "start_stuff_off";
/// Program method that appends one link.
pub const APPEND_METHOD: &str = "add_gif";
/// Account type name of the shared record.
pub const RECORD_ACCOUNT: &str = "BaseAccount";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgramError {
    #[error("data is shorter than a discriminator")]
    TooShort,
    #[error("discriminator does not match {0}")]
    WrongDiscriminator(&'static str),
    #[error("malformed data: {0}")]
    Malformed(String),
}

pub fn discriminator(namespace: &str, name: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("{namespace}:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

fn split_discriminator<'a>(
    data: &'a [u8],
    expected: [u8; 8],
    name: &'static str,
) -> Result<&'a [u8], ProgramError> {
    if data.len() < 8 {
        return Err(ProgramError::TooShort);
    }
    let (head, body) = data.split_at(8);
    if head != expected {
        return Err(ProgramError::WrongDiscriminator(name));
    }
    Ok(body)
}

/// One entry of the shared record.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecordItem {
    pub gif_link: String,
    pub user_address: Pubkey,
}

/// The decoded shared record account.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct SharedRecord {
    pub total_gifs: u64,
    pub gif_list: Vec<RecordItem>,
}

impl SharedRecord {
    /// Decodes account data. Accounts are allocated with spare room, so
    /// trailing bytes after the record are ignored.
    pub fn decode(data: &[u8]) -> Result<Self, ProgramError> {
        let mut body = split_discriminator(
            data,
            discriminator("account", RECORD_ACCOUNT),
            RECORD_ACCOUNT,
        )?;
        Self::deserialize(&mut body).map_err(|e| ProgramError::Malformed(e.to_string()))
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = discriminator("account", RECORD_ACCOUNT).to_vec();
        // writing into a Vec cannot fail
        self.serialize(&mut out).unwrap_or_default();
        out
    }
}

/// The two operations the program exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramInstruction {
    Initialize,
    AppendItem { link: String },
}

impl ProgramInstruction {
    pub fn data(&self) -> Vec<u8> {
        match self {
            Self::Initialize => discriminator("global", INITIALIZE_METHOD).to_vec(),
            Self::AppendItem { link } => {
                let mut out = discriminator("global", APPEND_METHOD).to_vec();
                link.serialize(&mut out).unwrap_or_default();
                out
            }
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self, ProgramError> {
        if data.len() < 8 {
            return Err(ProgramError::TooShort);
        }
        if data[..8] == discriminator("global", INITIALIZE_METHOD) {
            return Ok(Self::Initialize);
        }
        let mut body = split_discriminator(
            data,
            discriminator("global", APPEND_METHOD),
            APPEND_METHOD,
        )?;
        let link =
            String::deserialize(&mut body).map_err(|e| ProgramError::Malformed(e.to_string()))?;
        Ok(Self::AppendItem { link })
    }
}

/// Builds instructions for a deployed copy of the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkProgram {
    program_id: Pubkey,
}

impl LinkProgram {
    pub fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    /// Creates `record`, paid for by `user`. Both must sign.
    pub fn initialize(&self, record: &Pubkey, user: &Pubkey) -> Instruction {
        Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(*record, true),
                AccountMeta::new(*user, true),
                AccountMeta::new_readonly(Pubkey::SYSTEM_PROGRAM, false),
            ],
            data: ProgramInstruction::Initialize.data(),
        }
    }

    pub fn append_item(&self, record: &Pubkey, user: &Pubkey, link: &str) -> Instruction {
        Instruction {
            program_id: self.program_id,
            accounts: vec![AccountMeta::new(*record, false), AccountMeta::new(*user, true)],
            data: ProgramInstruction::AppendItem {
                link: link.to_string(),
            }
            .data(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminators_match_deployed_program() {
        assert_eq!(
            discriminator("account", RECORD_ACCOUNT),
            [16, 90, 130, 242, 159, 10, 232, 133]
        );
        assert_eq!(
            discriminator("global", INITIALIZE_METHOD),
            [126, 54, 85, 33, 226, 32, 195, 32]
        );
        assert_eq!(
            discriminator("global", APPEND_METHOD),
            [171, 74, 141, 100, 33, 70, 87, 155]
        );
    }

    #[test]
    fn append_data_is_length_prefixed_utf8() {
        let data = ProgramInstruction::AppendItem {
            link: "ab".to_string(),
        }
        .data();
        assert_eq!(&data[8..], [2, 0, 0, 0, b'a', b'b']);
        assert_eq!(
            ProgramInstruction::decode(&data).unwrap(),
            ProgramInstruction::AppendItem {
                link: "ab".to_string()
            }
        );
    }

    #[test]
    fn decodes_padded_account_data() {
        let record = SharedRecord {
            total_gifs: 2,
            gif_list: vec![
                RecordItem {
                    gif_link: "https://x/a.gif".to_string(),
                    user_address: Pubkey::new([1; 32]),
                },
                RecordItem {
                    gif_link: "https://x/b.gif".to_string(),
                    user_address: Pubkey::new([2; 32]),
                },
            ],
        };
        let mut data = record.encode();
        data.extend_from_slice(&[0; 128]);
        assert_eq!(SharedRecord::decode(&data).unwrap(), record);
    }

    #[test]
    fn rejects_foreign_account() {
        let mut data = SharedRecord::default().encode();
        data[0] ^= 1;
        assert_eq!(
            SharedRecord::decode(&data),
            Err(ProgramError::WrongDiscriminator(RECORD_ACCOUNT))
        );
        assert_eq!(SharedRecord::decode(&[1, 2]), Err(ProgramError::TooShort));
    }

    #[test]
    fn truncated_record_is_malformed() {
        let data = SharedRecord {
            total_gifs: 1,
            gif_list: vec![RecordItem {
                gif_link: "https://x/a.gif".to_string(),
                user_address: Pubkey::default(),
            }],
        }
        .encode();
        let err = SharedRecord::decode(&data[..data.len() - 4]).unwrap_err();
        assert!(matches!(err, ProgramError::Malformed(_)));
    }

    #[test]
    fn initialize_requires_record_signature() {
        let program = LinkProgram::new(Pubkey::new([9; 32]));
        let ix = program.initialize(&Pubkey::new([2; 32]), &Pubkey::new([1; 32]));
        assert!(ix.accounts[0].is_signer);
        assert!(ix.accounts[1].is_signer);
        assert_eq!(ix.accounts[2].pubkey, Pubkey::SYSTEM_PROGRAM);
        assert_eq!(
            ProgramInstruction::decode(&ix.data).unwrap(),
            ProgramInstruction::Initialize
        );
    }
}
