//! Location permission as granted by the host.

use futures::future::BoxFuture;
use nearby_core::PermissionSetting;

/// Host-owned permission state. `request` is only called while the status is
/// [`PermissionSetting::Undetermined`] and must settle on granted or denied.
pub trait PermissionGate: Send + Sync {
    fn status(&self) -> PermissionSetting;

    fn request(&self) -> BoxFuture<'_, PermissionSetting>;
}

/// A gate whose answer is fixed up front. An undetermined status is never
/// upgraded: requesting it yields [`PermissionSetting::Denied`].
#[derive(Debug, Clone, Copy)]
pub struct StaticPermission(pub PermissionSetting);

impl PermissionGate for StaticPermission {
    fn status(&self) -> PermissionSetting {
        self.0
    }

    fn request(&self) -> BoxFuture<'_, PermissionSetting> {
        let answer = match self.0 {
            PermissionSetting::Granted => PermissionSetting::Granted,
            PermissionSetting::Denied | PermissionSetting::Undetermined => {
                PermissionSetting::Denied
            }
        };
        Box::pin(async move { answer })
    }
}

/// Current status, asking the host first when it is undetermined.
pub async fn ensure_permission(gate: &dyn PermissionGate) -> PermissionSetting {
    match gate.status() {
        PermissionSetting::Undetermined => {
            let answer = gate.request().await;
            tracing::debug!(%answer, "location permission requested");
            answer
        }
        settled => settled,
    }
}
