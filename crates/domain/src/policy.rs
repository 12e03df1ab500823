use serde::{Deserialize, Serialize};

use crate::ad::AdPolicy;
use crate::credentials::{LoginPolicy, PasswordPolicy};
use crate::listing::ListingPolicy;

/// 不可变的策略集合，由配置构造后显式传入各个服务
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyBundle {
    pub login: LoginPolicy,
    pub password: PasswordPolicy,
    pub ad: AdPolicy,
    pub listing: ListingPolicy,
}
