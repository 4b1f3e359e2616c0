use uuid::Uuid;

use crate::error::DomainError;

/// Owner gate for content mutations: allow only when the acting identity is
/// the resource's author. Callers check existence first, so `NotFound` takes
/// precedence over the denial.
pub fn require_owner(actor: Uuid, owner: Uuid) -> Result<(), DomainError> {
    if actor == owner {
        Ok(())
    } else {
        Err(DomainError::NotOwner)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::require_owner;
    use crate::error::DomainError;

    #[test]
    fn owner_is_allowed() {
        let id = Uuid::new_v4();
        assert!(require_owner(id, id).is_ok());
    }

    #[test]
    fn non_owner_is_denied() {
        let err = require_owner(Uuid::new_v4(), Uuid::new_v4())
            .expect_err("different identities must be denied");
        assert!(matches!(err, DomainError::NotOwner));
    }
}
