use crate::domain::common::entities::app_errors::CoreError;
use crate::domain::common::MarketplaceConfig;
use crate::domain::recommendation::entities::MarketplaceLink;
use crate::domain::recommendation::ports::MarketplaceGateway;

pub const DEFAULT_ASSOCIATE_TAG: &str = "macmie-20";

/// Builds affiliate search links instead of calling a product API; the
/// marketplace has no ingredient search endpoint we could query directly.
#[derive(Debug, Clone)]
pub struct AmazonMarketplaceGateway {
    associate_tag: String,
}

impl AmazonMarketplaceGateway {
    pub fn new(associate_tag: String) -> Self {
        Self { associate_tag }
    }

    pub fn from_config(config: &MarketplaceConfig) -> Self {
        Self::new(config.associate_tag.clone())
    }
}

impl Default for AmazonMarketplaceGateway {
    fn default() -> Self {
        Self::new(DEFAULT_ASSOCIATE_TAG.to_string())
    }
}

impl MarketplaceGateway for AmazonMarketplaceGateway {
    async fn search_by_ingredients(
        &self,
        names: Vec<String>,
    ) -> Result<Vec<MarketplaceLink>, CoreError> {
        let links = names
            .iter()
            .map(|ingredient| {
                let encoded = urlencoding::encode(ingredient);
                MarketplaceLink {
                    title: format!("Shop {} skincare on Amazon", ingredient),
                    image: format!("https://via.placeholder.com/150x150?text={}", encoded),
                    price: "—".to_string(),
                    link: format!(
                        "https://www.amazon.com/s?k={}&i=beauty-intl-ship&tag={}",
                        encoded, self.associate_tag
                    ),
                }
            })
            .collect();

        Ok(links)
    }
}
