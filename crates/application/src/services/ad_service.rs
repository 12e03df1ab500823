use std::sync::Arc;

use domain::{
    Ad, AdDraft, AdId, AdPolicy, ListedAd, ListingParams, ListingPolicy, ListingQuery, UserId,
};
use tracing::{debug, info};

use crate::{
    clock::Clock,
    error::ApplicationError,
    repository::{AdRepository, UserRepository},
};

pub struct AdServiceDependencies {
    pub ad_repository: Arc<dyn AdRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub clock: Arc<dyn Clock>,
    pub ad_policy: AdPolicy,
    pub listing_policy: ListingPolicy,
}

/// 列表查询结果，没有匹配的广告时返回 `Empty` 而不是错误
#[derive(Debug, Clone, PartialEq)]
pub enum AdListing {
    Items(Vec<ListedAd>),
    Empty,
}

impl AdListing {
    pub fn into_items(self) -> Vec<ListedAd> {
        match self {
            AdListing::Items(items) => items,
            AdListing::Empty => Vec::new(),
        }
    }
}

pub struct AdService {
    deps: AdServiceDependencies,
}

impl AdService {
    pub fn new(deps: AdServiceDependencies) -> Self {
        Self { deps }
    }

    /// 校验并发布广告，作者名取自用户存储
    pub async fn create_ad(&self, author_id: UserId, draft: AdDraft) -> Result<Ad, ApplicationError> {
        let content = self.deps.ad_policy.validate(draft)?;

        let author = self
            .deps
            .user_repository
            .find_by_id(author_id)
            .await?
            .ok_or(ApplicationError::NotFound("author"))?;

        let ad = Ad::publish(AdId::generate(), content, &author, self.deps.clock.now());
        let stored = self.deps.ad_repository.create(ad).await?;

        info!(ad_id = %stored.id, author_id = %author_id, price = %stored.price, "ad created");
        Ok(stored)
    }

    /// 按列表策略规范化原始查询参数
    pub fn listing_query(&self, params: &ListingParams) -> ListingQuery {
        ListingQuery::normalize(params, &self.deps.listing_policy)
    }

    pub async fn list_ads(
        &self,
        query: &ListingQuery,
        requester: Option<UserId>,
    ) -> Result<AdListing, ApplicationError> {
        debug!(
            page = query.page,
            page_size = query.page_size,
            sort = %query.sort,
            direction = %query.direction,
            min_price = %query.min_price,
            "listing ads"
        );

        let ads = self
            .deps
            .ad_repository
            .query(query.to_store_query())
            .await?;
        if ads.is_empty() {
            return Ok(AdListing::Empty);
        }

        Ok(AdListing::Items(
            ads.into_iter()
                .map(|ad| ListedAd::stamp(ad, requester))
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::repository::{MockAdRepository, MockUserRepository};
    use domain::{
        DomainError, Login, PasswordHash, Price, RepositoryError, SortDirection, SortKey, User,
    };

    fn author(login: &str) -> User {
        User::register(
            UserId::generate(),
            Login::from_stored(login),
            PasswordHash::new("hash").unwrap(),
            chrono::Utc::now(),
        )
    }

    fn draft() -> AdDraft {
        AdDraft {
            title: "Bike".to_string(),
            description: "Almost new city bike".to_string(),
            image_url: "https://cdn.example.com/bike.jpg".to_string(),
            price: 150.0,
        }
    }

    fn service(ads: MockAdRepository, users: MockUserRepository) -> AdService {
        AdService::new(AdServiceDependencies {
            ad_repository: Arc::new(ads),
            user_repository: Arc::new(users),
            clock: Arc::new(SystemClock),
            ad_policy: AdPolicy::default(),
            listing_policy: ListingPolicy::default(),
        })
    }

    fn listed(author: &User, cents: i64) -> Ad {
        Ad {
            id: AdId::generate(),
            title: "Lamp".to_string(),
            description: "Desk lamp in good shape".to_string(),
            image_url: "lamp.png".to_string(),
            author_id: author.id,
            author_name: author.login.to_string(),
            price: Price::from_cents(cents).unwrap(),
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_ad_snapshots_author_name() {
        let alice = author("alice");
        let alice_id = alice.id;

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(alice.clone())));
        let mut ads = MockAdRepository::new();
        ads.expect_create().times(1).returning(Ok);

        let ad = service(ads, users)
            .create_ad(alice_id, draft())
            .await
            .unwrap();
        assert_eq!(ad.author_id, alice_id);
        assert_eq!(ad.author_name, "alice");
        assert_eq!(ad.price.cents(), 15000);
    }

    #[tokio::test]
    async fn test_create_ad_validation_happens_before_lookup() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().never();
        let mut ads = MockAdRepository::new();
        ads.expect_create().never();

        let mut bad = draft();
        bad.title = "Hi".to_string();
        let err = service(ads, users)
            .create_ad(UserId::generate(), bad)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Validation(DomainError::InvalidLength { field: "title", .. })
        ));
    }

    #[tokio::test]
    async fn test_create_ad_unknown_author_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));
        let mut ads = MockAdRepository::new();
        ads.expect_create().never();

        let err = service(ads, users)
            .create_ad(UserId::generate(), draft())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound("author")));
    }

    #[tokio::test]
    async fn test_create_ad_author_lookup_failure_is_not_ignored() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|_| Err(RepositoryError::storage("timeout")));
        let mut ads = MockAdRepository::new();
        ads.expect_create().never();

        let err = service(ads, users)
            .create_ad(UserId::generate(), draft())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Repository(_)));
    }

    #[tokio::test]
    async fn test_list_ads_passes_normalized_query_and_stamps_owner() {
        let alice = author("alice");
        let bob = author("bob");
        let page = vec![listed(&alice, 100), listed(&bob, 200)];

        let mut ads = MockAdRepository::new();
        ads.expect_query()
            .withf(|query| {
                query.offset == 10
                    && query.limit == 10
                    && query.sort == SortKey::Price
                    && query.direction == SortDirection::Desc
                    && query.max_price == Price::MAX
            })
            .returning(move |_| Ok(page.clone()));

        let service = service(ads, MockUserRepository::new());
        let query = service.listing_query(&ListingParams {
            page: Some("2".to_string()),
            sort_by: Some("price".to_string()),
            order: Some("desc".to_string()),
            ..ListingParams::default()
        });

        let items = service
            .list_ads(&query, Some(alice.id))
            .await
            .unwrap()
            .into_items();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_owner);
        assert!(!items[1].is_owner);
    }

    #[tokio::test]
    async fn test_list_ads_anonymous_owns_nothing() {
        let alice = author("alice");
        let page = vec![listed(&alice, 100)];
        let mut ads = MockAdRepository::new();
        ads.expect_query().returning(move |_| Ok(page.clone()));

        let service = service(ads, MockUserRepository::new());
        let listing = service
            .list_ads(&ListingQuery::default(), None)
            .await
            .unwrap();
        assert!(listing.into_items().iter().all(|item| !item.is_owner));
    }

    #[tokio::test]
    async fn test_list_ads_empty_is_explicit_outcome() {
        let mut ads = MockAdRepository::new();
        ads.expect_query().returning(|_| Ok(Vec::new()));

        let listing = service(ads, MockUserRepository::new())
            .list_ads(&ListingQuery::default(), None)
            .await
            .unwrap();
        assert_eq!(listing, AdListing::Empty);
    }

    #[tokio::test]
    async fn test_list_ads_storage_failure_propagates() {
        let mut ads = MockAdRepository::new();
        ads.expect_query()
            .returning(|_| Err(RepositoryError::storage("disk full")));

        let err = service(ads, MockUserRepository::new())
            .list_ads(&ListingQuery::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Repository(_)));
    }
}
