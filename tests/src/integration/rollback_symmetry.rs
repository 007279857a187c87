//! # Commit / Rollback Symmetry
//!
//! Undoing blocks one by one must walk back through exactly the state hashes
//! seen while applying them. Rejected blocks leave no trace in the walk.

#[cfg(test)]
mod tests {
    use crate::fixtures::{balance, block, chain, fee_of, hash_lock, transfer, Keys, CURRENCY};
    use cc_06_pipeline::ChainService;
    use proptest::prelude::*;
    use shared_types::{Amount, Hash256, Height};

    #[derive(Debug, Clone)]
    enum Action {
        Transfer { from: usize, to: usize, amount: u64 },
        Lock { duration: u64, seed: u8 },
        /// Sends the sender's whole balance minus the fee, off by `slack`.
        Drain { from: usize, to: usize, slack: i64 },
    }

    fn action_strategy() -> impl Strategy<Value = Action> {
        prop_oneof![
            4 => (0usize..2, 1usize..4, 1u64..5_000).prop_map(|(from, step, amount)| Action::Transfer {
                from,
                to: (from + step) % 4,
                amount,
            }),
            1 => (1u64..4, any::<u8>()).prop_map(|(duration, seed)| Action::Lock { duration, seed }),
            1 => (0usize..4, 1usize..4, -2i64..=2).prop_map(|(from, step, slack)| Action::Drain {
                from,
                to: (from + step) % 4,
                slack,
            }),
        ]
    }

    fn encode(service: &ChainService, keys: &Keys, action: &Action, nonce: usize) -> Vec<u8> {
        match action {
            Action::Transfer { from, to, amount } => transfer(keys, *from, *to, *amount),
            Action::Drain { from, to, slack } => {
                let fee = fee_of(&transfer(keys, *from, *to, 0)).0;
                let available = balance(service, &keys.address(*from), CURRENCY).0;
                let amount = (available as i64 - fee as i64 + slack).max(1);
                transfer(keys, *from, *to, amount as u64)
            }
            Action::Lock { duration, seed } => {
                let mut hash = [*seed; 32];
                hash[..8].copy_from_slice(&(nonce as u64).to_le_bytes());
                hash_lock(keys, 0, *duration, Hash256(hash))
            }
        }
    }

    fn funded_chain(keys: &Keys) -> ChainService {
        let (mut service, _sink) = chain();
        service
            .seed(|delta| {
                keys.fund(delta, 0, Amount(100_000_000));
                keys.fund(delta, 1, Amount(100_000_000));
            })
            .unwrap();
        service
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_undo_walks_back_through_state_hashes(
            blocks in prop::collection::vec(prop::collection::vec(action_strategy(), 0..4), 1..8)
        ) {
            let keys = Keys::new(4);
            let mut service = funded_chain(&keys);
            let mut hashes = vec![service.state_hash().unwrap()];

            let mut nonce = 0;
            for actions in &blocks {
                let transactions = actions
                    .iter()
                    .map(|action| {
                        nonce += 1;
                        encode(&service, &keys, action, nonce)
                    })
                    .collect();
                let before = service.state_hash().unwrap();
                let height = service.height();
                match service.apply_block(&block(height.0 + 1, transactions)) {
                    Ok(finalized) => {
                        prop_assert_eq!(finalized.state_hash, service.state_hash().unwrap());
                        hashes.push(finalized.state_hash);
                    }
                    Err(_) => {
                        prop_assert_eq!(service.state_hash().unwrap(), before);
                        prop_assert_eq!(service.height(), height);
                    }
                }
            }

            hashes.pop();
            while let Some(expected) = hashes.pop() {
                service.undo_last_block().unwrap();
                prop_assert_eq!(service.state_hash().unwrap(), expected);
            }
            prop_assert_eq!(service.height(), Height(1));
        }

        #[test]
        fn prop_transfer_near_balance_is_all_or_nothing(slack in -3i64..=3) {
            let keys = Keys::new(4);
            let (mut service, _sink) = chain();
            service.seed(|delta| keys.fund(delta, 2, Amount(10_000))).unwrap();
            let before = service.state_hash().unwrap();

            let fee = fee_of(&transfer(&keys, 2, 3, 0)).0 as i64;
            let amount = (10_000 - fee + slack) as u64;
            let result = service.apply_block(&block(2, vec![transfer(&keys, 2, 3, amount)]));

            if slack > 0 {
                prop_assert!(result.is_err());
                prop_assert_eq!(service.state_hash().unwrap(), before);
            } else {
                prop_assert!(result.is_ok());
                prop_assert_eq!(balance(&service, &keys.address(2), CURRENCY), Amount((-slack) as u64));
                prop_assert_eq!(balance(&service, &keys.address(3), CURRENCY), Amount(amount));
                service.undo_last_block().unwrap();
                prop_assert_eq!(service.state_hash().unwrap(), before);
            }
        }

        #[test]
        fn prop_rejected_block_changes_nothing(
            amount in 1u64..1_000,
            overdraft in 1u64..1_000,
        ) {
            let keys = Keys::new(4);
            let mut service = funded_chain(&keys);
            let before = service.state_hash().unwrap();

            // K2 owns nothing, so its transfer fails after K0's succeeded in the same delta
            let transactions = vec![transfer(&keys, 0, 3, amount), transfer(&keys, 2, 3, overdraft)];
            prop_assert!(service.apply_block(&block(2, transactions)).is_err());
            prop_assert_eq!(service.state_hash().unwrap(), before);
            prop_assert_eq!(service.height(), Height(1));
        }
    }
}
