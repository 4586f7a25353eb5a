//! Tenant stamping guard
//!
//! Applied to every newly inserted owned entity immediately before commit. A tenant caller
//! can never persist a row for someone else: whatever tenant id it sent is replaced. The
//! master keeps an explicit tenant id and only has a blank one filled in. Existing rows
//! are never stamped; updates keep the stored owner.

use uuid::Uuid;

use crate::context::TenantContext;
use crate::domain::Owned;

/// What the guard did to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stamp {
    /// The entity already carried the right owner.
    Kept,
    /// A blank tenant id was filled from the context.
    Assigned,
    /// A tenant caller named another tenant; the claim was replaced.
    Overwritten { claimed: Uuid },
}

pub fn stamp_tenant<E: Owned>(entity: &mut E, ctx: TenantContext) -> Stamp {
    if !entity.has_explicit_tenant() {
        entity.set_tenant_id(ctx.tenant_id());
        return Stamp::Assigned;
    }

    let claimed = entity.tenant_id();
    if ctx.is_master() || claimed == ctx.tenant_id() {
        return Stamp::Kept;
    }

    entity.set_tenant_id(ctx.tenant_id());
    Stamp::Overwritten { claimed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Entity;
    use chrono::{DateTime, Utc};
    use proptest::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Note {
        id: Uuid,
        tenant_id: Uuid,
        created_at: DateTime<Utc>,
    }

    impl Note {
        fn owned_by(tenant_id: Uuid) -> Self {
            Self { id: Uuid::new_v4(), tenant_id, created_at: Utc::now() }
        }
    }

    impl Entity for Note {
        const TABLE: &'static str = "notes";
        const NAME: &'static str = "Note";

        fn id(&self) -> Uuid {
            self.id
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }

        fn owner(&self) -> Option<Uuid> {
            Some(self.tenant_id)
        }
    }

    impl Owned for Note {
        fn tenant_id(&self) -> Uuid {
            self.tenant_id
        }

        fn set_tenant_id(&mut self, tenant_id: Uuid) {
            self.tenant_id = tenant_id;
        }
    }

    fn uuid() -> impl Strategy<Value = Uuid> {
        any::<u128>().prop_map(Uuid::from_u128)
    }

    #[test]
    fn blank_tenant_is_assigned() {
        let ctx = TenantContext::tenant(Uuid::new_v4());
        let mut note = Note::owned_by(Uuid::nil());
        assert_eq!(stamp_tenant(&mut note, ctx), Stamp::Assigned);
        assert_eq!(note.tenant_id, ctx.tenant_id());
    }

    #[test]
    fn master_fills_blank_with_acting_tenant() {
        let ctx = TenantContext::master(Uuid::new_v4());
        let mut note = Note::owned_by(Uuid::nil());
        assert_eq!(stamp_tenant(&mut note, ctx), Stamp::Assigned);
        assert_eq!(note.tenant_id, ctx.tenant_id());
    }

    #[test]
    fn own_tenant_is_kept() {
        let ctx = TenantContext::tenant(Uuid::new_v4());
        let mut note = Note::owned_by(ctx.tenant_id());
        assert_eq!(stamp_tenant(&mut note, ctx), Stamp::Kept);
    }

    proptest! {
        #[test]
        fn tenant_caller_always_persists_own_tenant(own in uuid(), claimed in uuid()) {
            let ctx = TenantContext::tenant(own);
            let mut note = Note::owned_by(claimed);
            stamp_tenant(&mut note, ctx);
            prop_assert_eq!(note.tenant_id, own);
        }

        #[test]
        fn master_keeps_explicit_tenant(acting in uuid(), named in uuid()) {
            prop_assume!(!named.is_nil());
            let ctx = TenantContext::master(acting);
            let mut note = Note::owned_by(named);
            prop_assert_eq!(stamp_tenant(&mut note, ctx), Stamp::Kept);
            prop_assert_eq!(note.tenant_id, named);
        }
    }
}
