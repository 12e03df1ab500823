//! 广告实体与内容规则

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};
use crate::user::User;
use crate::value_objects::{AdId, Price, Timestamp, UserId};

/// 已发布的广告，创建后不可修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ad {
    pub id: AdId,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub author_id: UserId,
    /// 发布时作者登录名的快照
    pub author_name: String,
    pub price: Price,
    pub created_at: Timestamp,
}

impl Ad {
    pub fn publish(id: AdId, content: ValidatedAd, author: &User, now: Timestamp) -> Self {
        Self {
            id,
            title: content.title,
            description: content.description,
            image_url: content.image_url,
            author_id: author.id,
            author_name: author.display_name().to_owned(),
            price: content.price,
            created_at: now,
        }
    }
}

/// 用户提交的广告内容，尚未校验
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdDraft {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: f64,
}

/// 通过内容规则校验的广告字段
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAd {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: Price,
}

/// 允许的图片扩展名，统一保存为带点的小写形式（如 `.jpg`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ImageTypes(BTreeSet<String>);

impl ImageTypes {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = types
            .into_iter()
            .map(|ext| {
                let ext = ext.as_ref().trim().to_lowercase();
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{ext}")
                }
            })
            .filter(|ext| ext.len() > 1)
            .collect();
        Self(set)
    }

    pub fn allows(&self, extension: &str) -> bool {
        self.0.contains(extension)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for ImageTypes {
    fn from(value: Vec<String>) -> Self {
        Self::new(value)
    }
}

impl From<ImageTypes> for Vec<String> {
    fn from(value: ImageTypes) -> Self {
        value.0.into_iter().collect()
    }
}

/// 广告内容策略
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdPolicy {
    pub title_min_length: usize,
    pub title_max_length: usize,
    pub description_min_length: usize,
    pub description_max_length: usize,
    pub allowed_image_types: ImageTypes,
    pub price_min: Price,
}

impl Default for AdPolicy {
    fn default() -> Self {
        Self {
            title_min_length: 3,
            title_max_length: 100,
            description_min_length: 10,
            description_max_length: 1000,
            allowed_image_types: ImageTypes::new(["jpg", "jpeg", "png"]),
            price_min: Price::CENT,
        }
    }
}

impl AdPolicy {
    /// 校验广告内容
    ///
    /// 检查顺序固定：必填字段与价格下限、标题长度、描述长度、图片类型。
    /// 只返回第一个不满足的规则。
    ///
    /// 价格下限按提交的原始数值比较；通过之后再四舍五入到分保存（19.999 保存为 20.00）。
    pub fn validate(&self, draft: AdDraft) -> DomainResult<ValidatedAd> {
        for (field, value) in [
            ("title", &draft.title),
            ("description", &draft.description),
            ("image_url", &draft.image_url),
        ] {
            if value.is_empty() {
                return Err(DomainError::EmptyField { field });
            }
        }

        let below_floor = DomainError::PriceBelowMinimum {
            min: self.price_min,
        };
        if !draft.price.is_finite() || draft.price < self.price_min.as_decimal() {
            return Err(below_floor);
        }
        let price = match Price::from_decimal(draft.price) {
            Ok(price) if price >= self.price_min => price,
            _ => return Err(below_floor),
        };

        check_length(
            "title",
            &draft.title,
            self.title_min_length,
            self.title_max_length,
        )?;
        check_length(
            "description",
            &draft.description,
            self.description_min_length,
            self.description_max_length,
        )?;

        let extension = image_extension(&draft.image_url).unwrap_or_default();
        if !self.allowed_image_types.allows(&extension) {
            return Err(DomainError::ImageTypeNotAllowed { extension });
        }

        Ok(ValidatedAd {
            title: draft.title,
            description: draft.description,
            image_url: draft.image_url,
            price,
        })
    }
}

fn check_length(field: &'static str, value: &str, min: usize, max: usize) -> DomainResult<()> {
    let length = value.chars().count();
    if length < min || length > max {
        return Err(DomainError::InvalidLength { field, min, max });
    }
    Ok(())
}

/// 取图片引用最后一段路径的扩展名（小写，带点），忽略查询串和锚点
fn image_extension(reference: &str) -> Option<String> {
    let path = reference.split(['?', '#']).next().unwrap_or(reference);
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rfind('.').map(|dot| name[dot..].to_lowercase())
}
