//! 경로별 접근 규칙
//!
//! 역할 집합과 권한 집합을 평면적으로 비교합니다. 상속이나 우선순위는 없습니다.
//! 역할 중 하나를 가지거나, 권한 중 하나를 가지면 통과합니다.
//! 둘 다 비어 있으면 인증만 요구합니다.

use crate::domain::entities::users::{KycStatus, Permission, Role};
use crate::domain::models::auth::AuthenticatedUser;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRule {
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
    /// KYC 승인을 요구하는지 여부. 슈퍼 관리자는 항상 통과합니다.
    pub require_kyc_approval: bool,
}

impl AccessRule {
    /// 인증만 요구
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn roles(roles: &[Role]) -> Self {
        Self { roles: roles.to_vec(), ..Self::default() }
    }

    pub fn or_permissions(mut self, permissions: &[Permission]) -> Self {
        self.permissions.extend_from_slice(permissions);
        self
    }

    pub fn with_kyc_approval(mut self) -> Self {
        self.require_kyc_approval = true;
        self
    }

    pub fn is_satisfied(&self, user: &AuthenticatedUser) -> bool {
        if self.roles.is_empty() && self.permissions.is_empty() {
            return true;
        }
        user.has_any_role(&self.roles) || self.permissions.iter().any(|p| user.has_permission(*p))
    }

    pub fn kyc_satisfied(&self, user: &AuthenticatedUser) -> bool {
        !self.require_kyc_approval || user.is_super_admin() || user.kyc_status == KycStatus::Approved
    }
}
