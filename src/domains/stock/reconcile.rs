// =====================================================
// 재고 정산 규칙
// Stock reconciliation rule
// =====================================================
// 출고(Sortie)의 생성/수정/삭제가 Materiel.Quantite 에 미치는 영향을 계산합니다.
// 순수 함수만 존재하며 I/O 는 없습니다. 저장소 구현체(Postgres, InMemory)는
// 행 잠금을 잡은 상태에서 이 함수들을 호출합니다.
//
// - create: S' = S - Q           (S < Q 이면 거부)
// - update: S' = S + Qo - Qn     (S' < 0 이면 거부)
// - delete: S' = S + Q           (항상 성공, overflow 제외)
// =====================================================

use std::collections::BTreeMap;
use thiserror::Error;

/// 정산 실패 사유
/// Reconciliation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// 재고 부족: `available` 만큼만 출고 가능
    #[error("insufficient stock: available={available}, requested={requested}")]
    Insufficient { available: i64, requested: i64 },

    #[error("stock quantity overflow")]
    Overflow,
}

/// 출고 생성: S - Q
/// Withdraw `quantity` from `stock`
pub fn withdraw(stock: i64, quantity: i64) -> Result<i64, ReconcileError> {
    if stock < quantity {
        return Err(ReconcileError::Insufficient {
            available: stock,
            requested: quantity,
        });
    }
    stock.checked_sub(quantity).ok_or(ReconcileError::Overflow)
}

/// 출고 수정 (같은 자재): S + Qo - Qn
/// Re-apply a withdrawal whose quantity changed from `previous` to `requested`
pub fn rebalance(stock: i64, previous: i64, requested: i64) -> Result<i64, ReconcileError> {
    let available = restore(stock, previous)?;
    withdraw(available, requested)
}

/// 출고 삭제: S + Q
/// Give a withdrawn `quantity` back to `stock`
pub fn restore(stock: i64, quantity: i64) -> Result<i64, ReconcileError> {
    stock.checked_add(quantity).ok_or(ReconcileError::Overflow)
}

/// 출고 한 건이 어떤 자재에서 얼마를 가져갔는지
/// One withdrawal: which materiel, how much
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Withdrawal<'a> {
    pub code_materiel: &'a str,
    pub quantity: i64,
}

/// 출고 수정 계획 수립 (자재 코드가 바뀌는 경우 포함)
/// Plan the stock levels after a sortie moves from `previous` to `requested`.
///
/// `levels` holds the current (locked) quantity of every materiel involved.
/// A previous materiel missing from `levels` is skipped on restore; the
/// requested materiel must be present. Returns the new level of each touched
/// materiel.
pub fn revise(
    previous: Withdrawal<'_>,
    requested: Withdrawal<'_>,
    levels: &BTreeMap<String, i64>,
) -> Result<BTreeMap<String, i64>, ReviseError> {
    let mut next = BTreeMap::new();

    if previous.code_materiel == requested.code_materiel {
        let stock = *levels
            .get(requested.code_materiel)
            .ok_or(ReviseError::MissingMateriel)?;
        let level = rebalance(stock, previous.quantity, requested.quantity)?;
        next.insert(requested.code_materiel.to_string(), level);
        return Ok(next);
    }

    if let Some(stock) = levels.get(previous.code_materiel) {
        next.insert(
            previous.code_materiel.to_string(),
            restore(*stock, previous.quantity)?,
        );
    }

    let stock = *levels
        .get(requested.code_materiel)
        .ok_or(ReviseError::MissingMateriel)?;
    next.insert(
        requested.code_materiel.to_string(),
        withdraw(stock, requested.quantity)?,
    );

    Ok(next)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReviseError {
    #[error("requested materiel is not locked")]
    MissingMateriel,

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn levels(pairs: &[(&str, i64)]) -> BTreeMap<String, i64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn lifecycle_example_returns_to_original_stock() {
        let created = withdraw(100, 30).unwrap();
        assert_eq!(created, 70);

        let updated = rebalance(created, 30, 50).unwrap();
        assert_eq!(updated, 50);

        let deleted = restore(updated, 50).unwrap();
        assert_eq!(deleted, 100);
    }

    #[test]
    fn withdraw_rejects_more_than_stock() {
        assert_eq!(
            withdraw(10, 11),
            Err(ReconcileError::Insufficient {
                available: 10,
                requested: 11
            })
        );
        assert_eq!(withdraw(10, 10), Ok(0));
    }

    #[test]
    fn rebalance_counts_the_previous_withdrawal_as_available() {
        // 재고 0, 기존 출고 5 → 최대 5 까지 수정 가능
        assert_eq!(rebalance(0, 5, 5), Ok(0));
        assert_eq!(
            rebalance(0, 5, 6),
            Err(ReconcileError::Insufficient {
                available: 5,
                requested: 6
            })
        );
    }

    #[test]
    fn restore_reports_overflow() {
        assert_eq!(restore(i64::MAX, 1), Err(ReconcileError::Overflow));
    }

    #[test]
    fn revise_same_materiel_is_rebalance() {
        let next = revise(
            Withdrawal { code_materiel: "M1", quantity: 30 },
            Withdrawal { code_materiel: "M1", quantity: 50 },
            &levels(&[("M1", 70)]),
        )
        .unwrap();
        assert_eq!(next, levels(&[("M1", 50)]));
    }

    #[test]
    fn revise_moving_to_another_materiel_restores_then_withdraws() {
        let next = revise(
            Withdrawal { code_materiel: "M1", quantity: 30 },
            Withdrawal { code_materiel: "M2", quantity: 5 },
            &levels(&[("M1", 70), ("M2", 10)]),
        )
        .unwrap();
        assert_eq!(next, levels(&[("M1", 100), ("M2", 5)]));
    }

    #[test]
    fn revise_moving_checks_only_the_new_materiel() {
        let err = revise(
            Withdrawal { code_materiel: "M1", quantity: 30 },
            Withdrawal { code_materiel: "M2", quantity: 11 },
            &levels(&[("M1", 70), ("M2", 10)]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ReviseError::Reconcile(ReconcileError::Insufficient {
                available: 10,
                requested: 11
            })
        );
    }

    #[test]
    fn revise_requires_the_requested_materiel() {
        let err = revise(
            Withdrawal { code_materiel: "M1", quantity: 1 },
            Withdrawal { code_materiel: "M9", quantity: 1 },
            &levels(&[("M1", 0)]),
        )
        .unwrap_err();
        assert_eq!(err, ReviseError::MissingMateriel);
    }

    proptest! {
        #[test]
        fn withdraw_succeeds_iff_quantity_fits(stock in 0i64..1_000_000, q in 1i64..1_000_000) {
            match withdraw(stock, q) {
                Ok(level) => {
                    prop_assert!(q <= stock);
                    prop_assert_eq!(level, stock - q);
                }
                Err(_) => prop_assert!(q > stock),
            }
        }

        #[test]
        fn rebalance_succeeds_iff_result_is_non_negative(
            stock in 0i64..1_000_000,
            old in 1i64..1_000_000,
            new in 1i64..1_000_000,
        ) {
            let expected = stock + old - new;
            match rebalance(stock, old, new) {
                Ok(level) => {
                    prop_assert!(expected >= 0);
                    prop_assert_eq!(level, expected);
                }
                Err(_) => prop_assert!(expected < 0),
            }
        }

        #[test]
        fn create_then_delete_is_identity(stock in 0i64..1_000_000, q in 1i64..1_000_000) {
            prop_assume!(q <= stock);
            let after = withdraw(stock, q).unwrap();
            prop_assert_eq!(restore(after, q).unwrap(), stock);
        }
    }
}
