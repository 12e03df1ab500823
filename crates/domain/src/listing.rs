//! 广告列表查询
//!
//! 传输层给出的查询参数全部是可选的原始字符串。规范化时任何缺失或无法解析的字段
//! 都回落到默认值，查询本身永远不会被拒绝。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ad::Ad;
use crate::value_objects::{Price, UserId};

/// 排序字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CreatedAt,
    Price,
}

impl SortKey {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" | "created_at" => Some(SortKey::CreatedAt),
            "price" => Some(SortKey::Price),
            _ => None,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::CreatedAt => write!(f, "date"),
            SortKey::Price => write!(f, "price"),
        }
    }
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// 列表分页策略
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingPolicy {
    pub default_page_size: u32,
    /// 超过上限的分页大小会被截断
    pub max_page_size: u32,
}

impl Default for ListingPolicy {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// 原始查询参数
#[derive(Debug, Clone, Default)]
pub struct ListingParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

impl ListingParams {
    /// 从查询字符串的键值对构造，同名参数只取第一次出现的值，未知参数忽略
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                "sort_by" => &mut params.sort_by,
                "order" => &mut params.order,
                "min_price" => &mut params.min_price,
                "max_price" => &mut params.max_price,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// 规范化之后的列表查询
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub page: u32,
    pub page_size: u32,
    pub sort: SortKey,
    pub direction: SortDirection,
    pub min_price: Price,
    pub max_price: Price,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self::normalize(&ListingParams::default(), &ListingPolicy::default())
    }
}

impl ListingQuery {
    pub fn normalize(params: &ListingParams, policy: &ListingPolicy) -> Self {
        let page = parse_positive(params.page.as_deref()).unwrap_or(1);

        let default_size = policy.default_page_size.max(1);
        let max_size = policy.max_page_size.max(default_size);
        let page_size = parse_positive(params.limit.as_deref())
            .unwrap_or(default_size)
            .min(max_size);

        let sort = params
            .sort_by
            .as_deref()
            .and_then(SortKey::parse)
            .unwrap_or_default();
        let direction = params
            .order
            .as_deref()
            .and_then(SortDirection::parse)
            .unwrap_or_default();

        let min_price = params
            .min_price
            .as_deref()
            .and_then(|raw| raw.parse::<Price>().ok())
            .unwrap_or(Price::ZERO);
        let max_price = params
            .max_price
            .as_deref()
            .and_then(|raw| raw.parse::<Price>().ok())
            .filter(|max| *max >= min_price)
            .unwrap_or(Price::MAX);

        Self {
            page,
            page_size,
            sort,
            direction,
            min_price,
            max_price,
        }
    }

    /// (page - 1) * page_size
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// 交给广告仓储执行的过滤、排序、分页参数
    pub fn to_store_query(&self) -> AdQuery {
        AdQuery {
            min_price: self.min_price,
            max_price: self.max_price,
            sort: self.sort,
            direction: self.direction,
            offset: self.offset(),
            limit: self.page_size,
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value >= 1)
}

/// 仓储层查询参数
///
/// 排序相同的记录按创建时间、再按ID排列，保证翻页稳定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdQuery {
    pub min_price: Price,
    pub max_price: Price,
    pub sort: SortKey,
    pub direction: SortDirection,
    pub offset: u64,
    pub limit: u32,
}

impl AdQuery {
    pub fn matches(&self, ad: &Ad) -> bool {
        ad.price >= self.min_price && ad.price <= self.max_price
    }
}

/// 带有“是否为本人发布”标记的广告，标记只在响应中计算，不会持久化
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListedAd {
    #[serde(flatten)]
    pub ad: Ad,
    pub is_owner: bool,
}

impl ListedAd {
    /// 匿名请求者（或空ID）不拥有任何广告
    pub fn stamp(ad: Ad, requester: Option<UserId>) -> Self {
        let is_owner = requester
            .filter(|id| !id.is_nil())
            .is_some_and(|id| id == ad.author_id);
        Self { ad, is_owner }
    }
}
