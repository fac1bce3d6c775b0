//! Per-request viewer identity. A missing credential downgrades to an
//! anonymous viewer; a credential that is present but malformed or expired is
//! carried as `Rejected` and must fail the request, never silently downgrade.

use crate::{
	MemberId,
	credential::{self, CredentialError, CredentialKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerContext {
	Anonymous,
	Authenticated(MemberId),
	Rejected(RejectReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
	Expired,
	Malformed,
}

impl ViewerContext {
	/// Resolves the optional raw credential carried by a request. Resolved
	/// once per request and threaded explicitly through aggregation calls.
	pub fn resolve(secret: &str, raw: Option<&str>) -> Self {
		let Some(raw) = raw else { return Self::Anonymous };

		match credential::resolve_member_id(secret, raw, CredentialKind::Access) {
			Ok(member_id) => Self::Authenticated(member_id),
			Err(CredentialError::Expired) => Self::Rejected(RejectReason::Expired),
			Err(_) => Self::Rejected(RejectReason::Malformed),
		}
	}

	pub fn member_id(&self) -> Option<MemberId> {
		match self {
			Self::Authenticated(member_id) => Some(*member_id),
			_ => None,
		}
	}

	pub fn is_anonymous(&self) -> bool {
		matches!(self, Self::Anonymous)
	}
}

#[cfg(test)]
mod tests {
	use time::{Duration, OffsetDateTime};

	use super::*;

	const SECRET: &str = "test-secret-test-secret-test-secret";

	#[test]
	fn missing_credential_is_anonymous() {
		let viewer = ViewerContext::resolve(SECRET, None);

		assert_eq!(viewer, ViewerContext::Anonymous);
		assert!(viewer.is_anonymous());
		assert_eq!(viewer.member_id(), None);
	}

	#[test]
	fn valid_credential_authenticates() {
		let raw = credential::issue(
			SECRET,
			7,
			CredentialKind::Access,
			Duration::days(10),
			OffsetDateTime::now_utc(),
		)
		.unwrap();

		assert_eq!(ViewerContext::resolve(SECRET, Some(&raw)), ViewerContext::Authenticated(7));
	}

	#[test]
	fn present_but_bad_credential_is_rejected_not_anonymous() {
		let viewer = ViewerContext::resolve(SECRET, Some("garbage"));

		assert_eq!(viewer, ViewerContext::Rejected(RejectReason::Malformed));
	}

	#[test]
	fn expired_credential_is_rejected() {
		let raw = credential::issue(
			SECRET,
			7,
			CredentialKind::Access,
			Duration::days(10),
			OffsetDateTime::now_utc() - Duration::days(11),
		)
		.unwrap();

		assert_eq!(
			ViewerContext::resolve(SECRET, Some(&raw)),
			ViewerContext::Rejected(RejectReason::Expired)
		);
	}
}
