//! Sortie permission policy.
//!
//! Pure decision function over (actor, resource). No I/O; the service layer
//! loads the sortie first and calls [`evaluate`] before mutating anything.

use crate::domains::stock::models::Sortie;
use crate::shared::middleware::auth::AuthenticatedUser;

/// 출고에 대해 수행하려는 작업
/// Action requested on an existing sortie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortieAction {
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    Allow,
    Deny,
}

impl PolicyDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, PolicyDecision::Allow)
    }
}

/// 관리자 또는 출고 소유자만 수정/삭제 가능
/// Admins may act on any sortie; other users only on their own.
pub fn evaluate(actor: &AuthenticatedUser, action: SortieAction, sortie: &Sortie) -> PolicyDecision {
    let allowed = match action {
        SortieAction::Update | SortieAction::Delete => {
            actor.is_admin() || actor.user_id == sortie.user_id
        }
    };

    if allowed {
        PolicyDecision::Allow
    } else {
        PolicyDecision::Deny
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::models::Role;
    use chrono::{NaiveDate, Utc};

    fn actor(user_id: u64, role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id,
            email: format!("user{}@example.com", user_id),
            role,
        }
    }

    fn sortie_owned_by(user_id: u64) -> Sortie {
        Sortie {
            bon_sortie: "BS-1".to_string(),
            code_materiel: "MAT-001".to_string(),
            user_id,
            quantite_sortant: 1,
            destinataire: "Atelier".to_string(),
            date_sortie: NaiveDate::from_ymd_opt(2024, 10, 20).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn owner_may_update_and_delete() {
        let sortie = sortie_owned_by(7);
        let owner = actor(7, Role::User);

        assert!(evaluate(&owner, SortieAction::Update, &sortie).is_allowed());
        assert!(evaluate(&owner, SortieAction::Delete, &sortie).is_allowed());
    }

    #[test]
    fn other_users_are_denied() {
        let sortie = sortie_owned_by(7);
        let stranger = actor(8, Role::User);

        assert_eq!(evaluate(&stranger, SortieAction::Update, &sortie), PolicyDecision::Deny);
        assert_eq!(evaluate(&stranger, SortieAction::Delete, &sortie), PolicyDecision::Deny);
    }

    #[test]
    fn admin_may_act_on_any_sortie() {
        let sortie = sortie_owned_by(7);
        let admin = actor(1, Role::Admin);

        assert!(evaluate(&admin, SortieAction::Update, &sortie).is_allowed());
        assert!(evaluate(&admin, SortieAction::Delete, &sortie).is_allowed());
    }
}
