//! Shared fixtures: deterministic keys, signed transaction buffers and a
//! chain service with every plugin enabled.

use cc_01_cache::{AccountStateCacheDescriptor, CatapultCacheDelta};
use cc_02_model::{
    BlockchainConfiguration, Cosignature, CosignatoryModification, CosignatoryModificationType, EmbeddedTransaction,
    TransactionBuilder,
};
use cc_05_plugins::aggregate::AggregateTransaction;
use cc_05_plugins::lock::HashLockTransaction;
use cc_05_plugins::multisig::ModifyMultisigAccountTransaction;
use cc_05_plugins::transfer::TransferTransaction;
use cc_06_pipeline::{Block, BroadcastFinalizationSink, ChainService, ExecutionConfig};
use ed25519_dalek::{Signer, SigningKey};
use shared_types::{
    make_version, public_key_to_address, sha3_256, Address, Amount, BinaryWriter, BlockDuration,
    BlockFeeMultiplier, EntityType, Hash256, Height, Key, MosaicId, NetworkIdentifier, Signature, Timestamp,
    UnresolvedAddress, UnresolvedMosaic,
};

pub const NETWORK: NetworkIdentifier = NetworkIdentifier::MIJIN_TEST;
pub const CURRENCY: MosaicId = MosaicId(0x0DC6_7FBE_1CAD_29E3);
pub const BLOCK_TIME: Timestamp = Timestamp(1_000);
pub const LOCKED_FUNDS: Amount = Amount(1_000);
pub const MAX_FEE: Amount = Amount(10_000);

pub const ALL_PLUGINS: [&str; 6] = ["transfer", "mosaic", "namespace", "multisig", "aggregate", "lockhash"];

/// Network configuration with every plugin section present.
pub fn network_config() -> BlockchainConfiguration {
    BlockchainConfiguration::default()
        .with_plugin_property("plugin:transfer", "maxMessageSize", "1024")
        .with_plugin_property("plugin:multisig", "maxMultisigDepth", "3")
        .with_plugin_property("plugin:multisig", "maxCosignersPerAccount", "10")
        .with_plugin_property("plugin:multisig", "maxCosignedAccountsPerAccount", "5")
        .with_plugin_property("plugin:multisig", "newCosignersMustApprove", "true")
        .with_plugin_property("plugin:aggregate", "maxTransactions", "100")
        .with_plugin_property("plugin:aggregate", "maxCosignaturesPerAggregate", "15")
        .with_plugin_property("plugin:aggregate", "enableStrictCosignatureCheck", "false")
        .with_plugin_property("plugin:aggregate", "enableBondedAggregateSupport", "true")
        .with_plugin_property("plugin:lockhash", "lockedFundsPerAggregate", "1'000")
        .with_plugin_property("plugin:lockhash", "maxHashLockDuration", "100")
}

/// Chain service with all plugins and metrics disabled.
pub fn chain() -> (ChainService, BroadcastFinalizationSink) {
    let execution = ExecutionConfig {
        record_metrics: false,
        ..ExecutionConfig::with_plugins(&ALL_PLUGINS)
    };
    ChainService::from_config(network_config(), &execution).expect("all plugins load")
}

// =============================================================================
// KEYS
// =============================================================================

/// Deterministic ed25519 keys, one per index.
pub struct Keys {
    keys: Vec<SigningKey>,
}

impl Keys {
    pub fn new(count: u8) -> Self {
        Self {
            keys: (1..=count).map(|seed| SigningKey::from_bytes(&[seed; 32])).collect(),
        }
    }

    pub fn key(&self, index: usize) -> Key {
        Key(self.keys[index].verifying_key().to_bytes())
    }

    pub fn address(&self, index: usize) -> Address {
        public_key_to_address(&self.key(index), NETWORK)
    }

    pub fn sign(&self, index: usize, data: &[u8]) -> Signature {
        Signature(self.keys[index].sign(data).to_bytes())
    }

    /// Adds the account with its public key and credits `amount` of the currency.
    pub fn fund(&self, delta: &mut CatapultCacheDelta, index: usize, amount: Amount) {
        let accounts = delta.sub_mut::<AccountStateCacheDescriptor>();
        accounts.add_account_with_key(self.key(index), NETWORK, Height(1));
        accounts
            .find_mut(&self.address(index))
            .expect("account was added")
            .balances
            .credit(CURRENCY, amount)
            .expect("credit fits");
    }
}

/// Currency balance of `address` in the committed state.
pub fn balance(service: &ChainService, address: &Address, mosaic_id: MosaicId) -> Amount {
    let view = service.create_view();
    let accounts = view.as_read_only().sub::<AccountStateCacheDescriptor>();
    accounts
        .find(address)
        .map(|account| account.balances.get(mosaic_id))
        .unwrap_or(Amount(0))
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

pub fn builder(keys: &Keys, signer: usize, entity_type: EntityType, payload: Vec<u8>) -> TransactionBuilder {
    TransactionBuilder::new(entity_type, make_version(NETWORK, 1))
        .signer(keys.key(signer))
        .max_fee(MAX_FEE)
        .deadline(Timestamp(BLOCK_TIME.0 + 60_000))
        .payload(payload)
}

pub fn signed(keys: &Keys, signer: usize, entity_type: EntityType, payload: Vec<u8>) -> Vec<u8> {
    builder(keys, signer, entity_type, payload).sign_with(|data| keys.sign(signer, data))
}

pub fn transfer_payload(recipient: UnresolvedAddress, mosaic_id: MosaicId, amount: Amount) -> Vec<u8> {
    TransferTransaction {
        recipient,
        message: Vec::new(),
        mosaics: vec![UnresolvedMosaic {
            mosaic_id: mosaic_id.to_unresolved(),
            amount,
        }],
    }
    .to_payload()
}

/// Signed currency transfer between two key indexes.
pub fn transfer(keys: &Keys, from: usize, to: usize, amount: u64) -> Vec<u8> {
    let payload = transfer_payload(keys.address(to).to_unresolved(), CURRENCY, Amount(amount));
    signed(keys, from, EntityType::TRANSFER, payload)
}

pub fn multisig_payload(
    min_removal_delta: i8,
    min_approval_delta: i8,
    modifications: &[(CosignatoryModificationType, Key)],
) -> Vec<u8> {
    ModifyMultisigAccountTransaction {
        min_removal_delta,
        min_approval_delta,
        modifications: modifications
            .iter()
            .map(|(modification_type, cosignatory_key)| CosignatoryModification {
                modification_type: *modification_type,
                cosignatory_key: *cosignatory_key,
            })
            .collect(),
    }
    .to_payload()
}

pub fn embedded(keys: &Keys, signer: usize, entity_type: EntityType, payload: Vec<u8>) -> EmbeddedTransaction {
    EmbeddedTransaction::new(keys.key(signer), make_version(NETWORK, 1), entity_type, payload)
}

/// Aggregate buffer and the hash its cosigners signed.
pub struct SignedAggregate {
    pub bytes: Vec<u8>,
    pub hash: Hash256,
}

/// Signs an aggregate as `signer`, then appends a cosignature from each of `cosigners`.
///
/// Cosignatures sit outside the signed data buffer, so appending them only
/// updates the size field.
pub fn aggregate(
    keys: &Keys,
    signer: usize,
    entity_type: EntityType,
    transactions: Vec<EmbeddedTransaction>,
    cosigners: &[usize],
) -> SignedAggregate {
    let payload = AggregateTransaction {
        transactions,
        cosignatures: Vec::new(),
    }
    .to_payload();
    let mut bytes = signed(keys, signer, entity_type, payload);

    let hash = sha3_256(&[&bytes[4..68], &bytes[68..100], &bytes[100..]]);
    let mut writer = BinaryWriter::new();
    for cosigner in cosigners {
        Cosignature {
            signer: keys.key(*cosigner),
            signature: keys.sign(*cosigner, hash.as_ref()),
        }
        .write(&mut writer);
    }
    bytes.extend_from_slice(&writer.into_bytes());

    let size = bytes.len() as u32;
    bytes[..4].copy_from_slice(&size.to_le_bytes());
    SignedAggregate { bytes, hash }
}

pub fn hash_lock(keys: &Keys, signer: usize, duration: u64, hash: Hash256) -> Vec<u8> {
    let payload = HashLockTransaction {
        mosaic: UnresolvedMosaic {
            mosaic_id: CURRENCY.to_unresolved(),
            amount: LOCKED_FUNDS,
        },
        duration: BlockDuration(duration),
        hash,
    }
    .to_payload();
    signed(keys, signer, EntityType::HASH_LOCK, payload)
}

pub fn block(height: u64, transactions: Vec<Vec<u8>>) -> Block {
    Block {
        height: Height(height),
        timestamp: BLOCK_TIME,
        fee_multiplier: BlockFeeMultiplier(1),
        transactions,
    }
}

/// Fee charged for `bytes` at multiplier 1.
pub fn fee_of(bytes: &[u8]) -> Amount {
    Amount(bytes.len() as u64)
}
