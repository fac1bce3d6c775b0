use bella_domain::viewer::ViewerContext;

use crate::{BellaService, Error, Result};

impl BellaService {
	/// Resolves the optional bearer credential into a viewer context, once
	/// per request. A missing credential is an anonymous viewer; a present
	/// but invalid one resolves to `Rejected` and fails whichever operation
	/// it is threaded into.
	pub fn resolve_viewer(&self, credential: Option<&str>) -> ViewerContext {
		ViewerContext::resolve(&self.cfg.auth.jwt_secret, credential)
	}
}

/// Aggregations that permit anonymous viewers still fail on a rejected one.
pub(crate) fn ensure_not_rejected(viewer: &ViewerContext) -> Result<()> {
	match viewer {
		ViewerContext::Rejected(_) => Err(Error::InvalidCredential),
		_ => Ok(()),
	}
}

/// Operations that write on behalf of a member require an authenticated
/// viewer; anonymous is not enough.
pub(crate) fn member_id_of(viewer: &ViewerContext) -> Result<i64> {
	viewer.member_id().ok_or(Error::InvalidCredential)
}

#[cfg(test)]
mod tests {
	use bella_domain::viewer::RejectReason;

	use super::*;

	#[test]
	fn anonymous_passes_aggregation_gate_but_not_writes() {
		assert!(ensure_not_rejected(&ViewerContext::Anonymous).is_ok());
		assert!(matches!(
			member_id_of(&ViewerContext::Anonymous),
			Err(Error::InvalidCredential)
		));
	}

	#[test]
	fn rejected_fails_both_gates() {
		let viewer = ViewerContext::Rejected(RejectReason::Expired);

		assert!(matches!(ensure_not_rejected(&viewer), Err(Error::InvalidCredential)));
		assert!(matches!(member_id_of(&viewer), Err(Error::InvalidCredential)));
	}

	#[test]
	fn authenticated_passes_both_gates() {
		let viewer = ViewerContext::Authenticated(9);

		assert!(ensure_not_rejected(&viewer).is_ok());
		assert_eq!(member_id_of(&viewer).unwrap(), 9);
	}
}
