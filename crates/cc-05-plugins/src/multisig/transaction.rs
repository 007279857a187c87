//! Modify multisig account transaction.
//!
//! ```text
//! 0  min_removal_delta    i8
//! 1  min_approval_delta   i8
//! 2  modifications_count  u8
//! 3  modifications        count × (type u8, cosignatory key [u8; 32])
//! ```

use super::MultisigConfiguration;
use cc_02_model::{
    AccountPublicKeyNotification, BlockchainConfiguration, CosignatoryModification,
    CosignatoryModificationType, ModifyMultisigCosignersNotification,
    ModifyMultisigNewCosignerNotification, ModifyMultisigSettingsNotification, NotificationSubscriber,
    TransactionBody, TransactionView,
};
use shared_types::{BinaryReader, BinaryWriter, CodecError, EntityType, Key};
use std::collections::BTreeSet;

const FIXED_PAYLOAD_SIZE: u64 = 3;
const MODIFICATION_SIZE: u64 = 1 + 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyMultisigAccountTransaction {
    pub min_removal_delta: i8,
    pub min_approval_delta: i8,
    pub modifications: Vec<CosignatoryModification>,
}

impl ModifyMultisigAccountTransaction {
    pub fn parse(payload: &[u8]) -> Result<Self, CodecError> {
        let mut reader = BinaryReader::new(payload);
        let min_removal_delta = reader.read_i8()?;
        let min_approval_delta = reader.read_i8()?;
        let count = reader.read_u8()?;

        let mut modifications = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            let raw_type = reader.read_u8()?;
            let modification_type =
                CosignatoryModificationType::from_u8(raw_type).ok_or(CodecError::InvalidValue {
                    field: "modification type",
                    value: u64::from(raw_type),
                })?;
            modifications.push(CosignatoryModification {
                modification_type,
                cosignatory_key: reader.read_key()?,
            });
        }

        Ok(Self {
            min_removal_delta,
            min_approval_delta,
            modifications,
        })
    }

    pub fn to_payload(&self) -> Vec<u8> {
        let mut writer = BinaryWriter::new();
        writer
            .write_i8(self.min_removal_delta)
            .write_i8(self.min_approval_delta)
            .write_u8(self.modifications.len() as u8);
        for modification in &self.modifications {
            writer
                .write_u8(modification.modification_type as u8)
                .write_bytes(modification.cosignatory_key.as_ref());
        }
        writer.into_bytes()
    }

    pub fn added_cosignatories(&self) -> impl Iterator<Item = &Key> + '_ {
        self.modifications_of(CosignatoryModificationType::Add)
    }

    fn modifications_of(&self, modification_type: CosignatoryModificationType) -> impl Iterator<Item = &Key> + '_ {
        self.modifications
            .iter()
            .filter(move |modification| modification.modification_type == modification_type)
            .map(|modification| &modification.cosignatory_key)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ModifyMultisigAccountTransactionBody;

impl TransactionBody for ModifyMultisigAccountTransactionBody {
    const ENTITY_TYPE: EntityType = EntityType::MODIFY_MULTISIG_ACCOUNT;

    fn payload_size(&self, payload: &[u8]) -> Option<u64> {
        let count = u64::from(*payload.get(2)?);
        Some(FIXED_PAYLOAD_SIZE + count * MODIFICATION_SIZE)
    }

    fn publish(
        &self,
        transaction: &TransactionView<'_>,
        sub: &mut dyn NotificationSubscriber,
    ) -> Result<(), CodecError> {
        let modify = ModifyMultisigAccountTransaction::parse(transaction.payload)?;
        let signer = transaction.signer;

        let added = modify.added_cosignatories().count();
        let removed = modify.modifications.len() - added;

        for cosignatory_key in modify.added_cosignatories() {
            sub.notify(
                AccountPublicKeyNotification {
                    public_key: *cosignatory_key,
                }
                .into(),
            );
            sub.notify(
                ModifyMultisigNewCosignerNotification {
                    multisig_account_key: signer,
                    cosignatory_key: *cosignatory_key,
                }
                .into(),
            );
        }

        if !modify.modifications.is_empty() {
            sub.notify(
                ModifyMultisigCosignersNotification {
                    signer,
                    modifications: modify.modifications.clone(),
                }
                .into(),
            );
        }

        sub.notify(
            ModifyMultisigSettingsNotification {
                signer,
                min_removal_delta: modify.min_removal_delta,
                min_approval_delta: modify.min_approval_delta,
                cosignatories_added: added as u8,
                cosignatories_removed: removed as u8,
            }
            .into(),
        );

        Ok(())
    }

    fn additional_required_cosigners(
        &self,
        transaction: &TransactionView<'_>,
        config: &BlockchainConfiguration,
    ) -> BTreeSet<Key> {
        let must_approve = config
            .plugin_config::<MultisigConfiguration>()
            .map(|multisig_config| multisig_config.new_cosigners_must_approve)
            .unwrap_or(false);
        if !must_approve {
            return BTreeSet::new();
        }

        ModifyMultisigAccountTransaction::parse(transaction.payload)
            .map(|modify| modify.added_cosignatories().copied().collect())
            .unwrap_or_default()
    }
}
