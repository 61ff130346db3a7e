//! Uniform access to `VersionedMessage` headers and signer keys
//!
//! The assembler only compiles v0 messages, but transactions handed back in
//! for submission may be legacy. These helpers read both without matching on
//! the version at every call site.

use solana_sdk::{
    message::{MessageHeader, VersionedMessage},
    pubkey::Pubkey,
};

#[inline]
#[must_use]
pub fn get_message_header(message: &VersionedMessage) -> &MessageHeader {
    match message {
        VersionedMessage::Legacy(legacy_msg) => &legacy_msg.header,
        VersionedMessage::V0(v0_msg) => &v0_msg.header,
    }
}

/// Keys embedded in the message itself
///
/// For v0 messages this excludes addresses loaded through lookup tables.
#[inline]
#[must_use]
pub fn get_static_account_keys(message: &VersionedMessage) -> &[Pubkey] {
    match message {
        VersionedMessage::Legacy(legacy_msg) => &legacy_msg.account_keys,
        VersionedMessage::V0(v0_msg) => &v0_msg.account_keys,
    }
}

/// Keys that must sign, in signature-slot order (fee payer first)
#[inline]
#[must_use]
pub fn get_required_signers(message: &VersionedMessage) -> &[Pubkey] {
    let keys = get_static_account_keys(message);
    let count = get_num_required_signatures(message) as usize;
    &keys[..count.min(keys.len())]
}

#[inline]
#[must_use]
pub fn get_num_required_signatures(message: &VersionedMessage) -> u8 {
    get_message_header(message).num_required_signatures
}

/// Signature slot of `key`, `None` if it is not a required signer
#[must_use]
pub fn signer_index(message: &VersionedMessage, key: &Pubkey) -> Option<usize> {
    get_required_signers(message).iter().position(|k| k == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::{
        hash::Hash,
        instruction::{AccountMeta, Instruction},
        message::{v0::Message as MessageV0, Message},
    };

    fn escrow_ix(payer: &Pubkey, co_signer: &Pubkey) -> Instruction {
        Instruction::new_with_bytes(
            Pubkey::new_unique(),
            &[1, 0, 0, 0, 0, 0, 0, 0, 0],
            vec![
                AccountMeta::new(*payer, true),
                AccountMeta::new(*co_signer, true),
                AccountMeta::new(Pubkey::new_unique(), false),
            ],
        )
    }

    #[test]
    fn test_v0_signers_payer_first() {
        let payer = Pubkey::new_unique();
        let co_signer = Pubkey::new_unique();
        let message = VersionedMessage::V0(
            MessageV0::try_compile(&payer, &[escrow_ix(&payer, &co_signer)], &[], Hash::default())
                .unwrap(),
        );

        assert_eq!(get_num_required_signatures(&message), 2);
        assert_eq!(get_required_signers(&message), &[payer, co_signer]);
        assert_eq!(signer_index(&message, &co_signer), Some(1));
        assert_eq!(get_message_header(&message).num_readonly_signed_accounts, 0);
    }

    #[test]
    fn test_legacy_message() {
        let payer = Pubkey::new_unique();
        let co_signer = Pubkey::new_unique();
        let message = VersionedMessage::Legacy(Message::new(
            &[escrow_ix(&payer, &co_signer)],
            Some(&payer),
        ));

        assert_eq!(get_static_account_keys(&message)[0], payer);
        assert_eq!(get_required_signers(&message).len(), 2);
        // program id plus the writable escrow account
        assert_eq!(get_static_account_keys(&message).len(), 4);
    }

    #[test]
    fn test_non_signer_has_no_slot() {
        let payer = Pubkey::new_unique();
        let co_signer = Pubkey::new_unique();
        let ix = escrow_ix(&payer, &co_signer);
        let outsider = ix.accounts[2].pubkey;
        let message = VersionedMessage::V0(
            MessageV0::try_compile(&payer, &[ix], &[], Hash::default()).unwrap(),
        );

        assert_eq!(signer_index(&message, &outsider), None);
        assert_eq!(signer_index(&message, &Pubkey::new_unique()), None);
    }
}
