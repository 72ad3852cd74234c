use crate::domain::recommendation::ports::{
    IngredientRepository, LlmClient, MarketplaceGateway, ProductRepository,
    RecommendationRepository,
};

/// Aggregate service over every port the domain needs. Business logic is
/// attached through the service traits in each bounded context.
#[derive(Debug, Clone)]
pub struct Service<RR, PR, IR, MG, LLM>
where
    RR: RecommendationRepository,
    PR: ProductRepository,
    IR: IngredientRepository,
    MG: MarketplaceGateway,
    LLM: LlmClient,
{
    pub(crate) recommendation_repository: RR,
    pub(crate) product_repository: PR,
    pub(crate) ingredient_repository: IR,
    pub(crate) marketplace_gateway: MG,
    pub(crate) llm_client: LLM,
}

impl<RR, PR, IR, MG, LLM> Service<RR, PR, IR, MG, LLM>
where
    RR: RecommendationRepository,
    PR: ProductRepository,
    IR: IngredientRepository,
    MG: MarketplaceGateway,
    LLM: LlmClient,
{
    pub fn new(
        recommendation_repository: RR,
        product_repository: PR,
        ingredient_repository: IR,
        marketplace_gateway: MG,
        llm_client: LLM,
    ) -> Self {
        Self {
            recommendation_repository,
            product_repository,
            ingredient_repository,
            marketplace_gateway,
            llm_client,
        }
    }
}
