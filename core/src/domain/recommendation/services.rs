use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::domain::common::entities::app_errors::CoreError;
use crate::domain::common::services::Service;
use crate::domain::profile::entities::{SkinProfile, DEFAULT_SKIN_TYPE};
use crate::domain::recommendation::entities::{
    AnalysisScores, ImageAnalysis, RecommendationRecord, RecommendationSnapshot, RoutinePlan,
    Source, StoredImage,
};
use crate::domain::recommendation::ports::{
    IngredientRepository, LlmClient, MarketplaceGateway, ProductRepository,
    RecommendationRepository, RecommendationService,
};
use crate::domain::recommendation::ranking::{
    rank_products, MARKETPLACE_FALLBACK_MIN_MATCHES, MARKETPLACE_QUERY_INGREDIENTS,
};
use crate::domain::recommendation::value_objects::{
    AnalysisHints, HistoryItem, HistoryPage, ImagePayload, PlanTier, RecommendInput,
    RecommendWithImageInput, RecommendationResponse, RequestContext, ResponseMeta,
    SynthesisSource, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT,
};
use crate::domain::recommendation::{insights, parser, routine, rules};

const FALLBACK_IMAGE_MIME: &str = "image/jpeg";

impl<RR, PR, IR, MG, LLM> RecommendationService for Service<RR, PR, IR, MG, LLM>
where
    RR: RecommendationRepository,
    PR: ProductRepository,
    IR: IngredientRepository,
    MG: MarketplaceGateway,
    LLM: LlmClient,
{
    async fn recommend(
        &self,
        input: RecommendInput,
        ctx: RequestContext,
    ) -> Result<RecommendationResponse, CoreError> {
        let profile = SkinProfile::from_raw(&input.profile);
        self.build_recommendation(profile, None, None, Source::Form, ctx)
            .await
    }

    async fn recommend_with_image(
        &self,
        input: RecommendWithImageInput,
        ctx: RequestContext,
    ) -> Result<RecommendationResponse, CoreError> {
        let image = input.image.ok_or(CoreError::ImageRequired)?;
        let profile = SkinProfile::from_raw(&input.profile);

        let hints = AnalysisHints {
            skin_type: profile.skin_type.clone(),
            concerns: profile.concerns.clone(),
            photo_notes: input.profile.photo_notes.clone(),
        };
        let analysis = match self.llm_client.analyze_image(image.clone(), hints).await {
            Ok(raw) => parser::parse_image_analysis(&raw),
            Err(error) => {
                warn!(%error, "image analysis call failed, using default analysis");
                ImageAnalysis::default()
            }
        };

        let profile = merge_analysis_into_profile(profile, &analysis);
        self.build_recommendation(profile, Some(analysis), Some(image), Source::Image, ctx)
            .await
    }

    async fn get_history(
        &self,
        user_id: Uuid,
        limit: Option<u32>,
    ) -> Result<HistoryPage, CoreError> {
        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);

        let records = self
            .recommendation_repository
            .get_by_user(user_id, limit, None)
            .await?;

        Ok(HistoryPage {
            items: records.into_iter().map(HistoryItem::from).collect(),
        })
    }

    async fn get_progress_image(
        &self,
        record_id: Uuid,
    ) -> Result<Option<StoredImage>, CoreError> {
        let record = self.recommendation_repository.get_by_id(record_id).await?;

        Ok(record.and_then(|record| {
            record.image_data.map(|data| StoredImage {
                data,
                mime_type: record
                    .image_mime_type
                    .unwrap_or_else(|| FALLBACK_IMAGE_MIME.to_string()),
            })
        }))
    }
}

impl<RR, PR, IR, MG, LLM> Service<RR, PR, IR, MG, LLM>
where
    RR: RecommendationRepository,
    PR: ProductRepository,
    IR: IngredientRepository,
    MG: MarketplaceGateway,
    LLM: LlmClient,
{
    /// Shared tail of both recommendation paths: synthesize ingredients,
    /// rank the catalog, enrich with insights and a routine, then persist
    /// best-effort for authenticated callers.
    async fn build_recommendation(
        &self,
        profile: SkinProfile,
        analysis: Option<ImageAnalysis>,
        image: Option<ImagePayload>,
        source: Source,
        ctx: RequestContext,
    ) -> Result<RecommendationResponse, CoreError> {
        let ai_candidates = match self
            .llm_client
            .generate_ingredient_advice(profile.clone())
            .await
        {
            Ok(raw) => parser::parse_ingredient_list(&raw),
            Err(error) => {
                warn!(%error, "ingredient advice call failed, continuing rules-only");
                Vec::new()
            }
        };
        let synthesis_source = if ai_candidates.is_empty() {
            SynthesisSource::RulesOnly
        } else {
            SynthesisSource::AiAssisted
        };

        let recommended = rules::synthesize_ingredients(&ai_candidates, &profile);

        let products = self
            .product_repository
            .find_by_ingredients(recommended.clone())
            .await?;
        let matching_products = rank_products(products, &recommended);

        let marketplace_links = if matching_products.len() < MARKETPLACE_FALLBACK_MIN_MATCHES {
            let query: Vec<String> = recommended
                .iter()
                .take(MARKETPLACE_QUERY_INGREDIENTS)
                .cloned()
                .collect();
            self.marketplace_gateway.search_by_ingredients(query).await?
        } else {
            Vec::new()
        };

        let catalog = match self
            .ingredient_repository
            .find_by_names(recommended.clone())
            .await
        {
            Ok(catalog) => catalog,
            Err(error) => {
                warn!(%error, "ingredient metadata lookup failed, inferring insights");
                Vec::new()
            }
        };
        let ingredient_insights = insights::build_ingredient_insights(&recommended, catalog);

        let routine = routine::build_routine(&recommended, &profile);

        let pro_insights = match ctx.plan_tier {
            PlanTier::Pro => Some(insights::build_pro_insights(
                &profile.concerns,
                &recommended,
                analysis.as_ref(),
            )),
            PlanTier::Free => None,
        };

        let saved = match ctx.user_id {
            Some(user_id) => {
                self.persist_record(
                    user_id,
                    source,
                    &profile,
                    &recommended,
                    &routine,
                    synthesis_source,
                    analysis.as_ref(),
                    image.as_ref(),
                )
                .await
            }
            None => false,
        };

        Ok(RecommendationResponse {
            profile,
            recommended_ingredients: recommended,
            insights: ingredient_insights,
            matching_products,
            marketplace_links,
            routine,
            image_analysis: analysis,
            pro_insights,
            meta: ResponseMeta {
                source: synthesis_source,
                saved,
                generated_at: Utc::now(),
            },
        })
    }

    /// Write the history record. Failure is logged and reported through the
    /// `saved` flag; the recommendation itself still succeeds.
    #[allow(clippy::too_many_arguments)]
    async fn persist_record(
        &self,
        user_id: Uuid,
        source: Source,
        profile: &SkinProfile,
        recommended: &[String],
        routine: &RoutinePlan,
        synthesis_source: SynthesisSource,
        analysis: Option<&ImageAnalysis>,
        image: Option<&ImagePayload>,
    ) -> bool {
        let snapshot = RecommendationSnapshot {
            recommended_ingredients: recommended.to_vec(),
            routine: routine.clone(),
            synthesis_source,
        };
        let image_analysis = analysis.and_then(|a| serde_json::to_value(a).ok());
        let analysis_scores = analysis
            .map(AnalysisScores::from)
            .and_then(|scores| serde_json::to_value(&scores).ok());

        let record = RecommendationRecord::new(
            Some(user_id),
            source,
            profile.clone(),
            snapshot,
            image_analysis,
            analysis_scores,
            image.map(|i| i.data.to_vec()),
            image.map(|i| i.mime_type.clone()),
        );

        let created = match self.recommendation_repository.create(record).await {
            Ok(created) => created,
            Err(error) => {
                warn!(%error, "failed to persist recommendation record");
                return false;
            }
        };

        if created.image_data.is_some() {
            let image_url = format!("/image/{}", created.id);
            if let Err(error) = self
                .recommendation_repository
                .set_image_url(created.id, image_url)
                .await
            {
                warn!(%error, record_id = %created.id, "failed to backfill image url");
            }
        }

        true
    }
}

/// Fold image findings into the self-reported profile: detected concerns
/// are unioned in, and the suggested skin type only replaces a defaulted
/// one. Explicit user input always wins.
fn merge_analysis_into_profile(mut profile: SkinProfile, analysis: &ImageAnalysis) -> SkinProfile {
    for concern in &analysis.detected_concerns {
        if !profile.concerns.contains(concern) {
            profile.concerns.push(concern.clone());
        }
    }

    if profile.skin_type == DEFAULT_SKIN_TYPE {
        if let Some(suggested) = &analysis.suggested_skin_type {
            profile.skin_type = suggested.clone();
        }
    }

    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use serde_json::json;
    use uuid::Uuid;

    use crate::domain::profile::value_objects::RawProfileInput;
    use crate::domain::recommendation::entities::Product;
    use crate::domain::recommendation::ports::{
        MockIngredientRepository, MockLlmClient, MockMarketplaceGateway, MockProductRepository,
        MockRecommendationRepository,
    };

    type TestService = Service<
        MockRecommendationRepository,
        MockProductRepository,
        MockIngredientRepository,
        MockMarketplaceGateway,
        MockLlmClient,
    >;

    struct Mocks {
        recommendations: MockRecommendationRepository,
        products: MockProductRepository,
        ingredients: MockIngredientRepository,
        marketplace: MockMarketplaceGateway,
        llm: MockLlmClient,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                recommendations: MockRecommendationRepository::new(),
                products: MockProductRepository::new(),
                ingredients: MockIngredientRepository::new(),
                marketplace: MockMarketplaceGateway::new(),
                llm: MockLlmClient::new(),
            }
        }

        fn into_service(self) -> TestService {
            Service::new(
                self.recommendations,
                self.products,
                self.ingredients,
                self.marketplace,
                self.llm,
            )
        }
    }

    fn raw_profile(skin_type: &str, concerns: &[&str]) -> RawProfileInput {
        RawProfileInput {
            skin_type: Some(skin_type.to_string()),
            concerns: Some(json!(concerns)),
            ..Default::default()
        }
    }

    fn payload() -> ImagePayload {
        ImagePayload {
            data: Bytes::from_static(b"jpeg bytes"),
            mime_type: "image/jpeg".to_string(),
        }
    }

    fn product(name: &str, ingredients: &[&str]) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            brand: "Brand".to_string(),
            ingredients: ingredients.iter().map(|i| i.to_string()).collect(),
            purchase_url: "https://example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn rules_only_path_survives_llm_outage() {
        let mut mocks = Mocks::new();
        mocks
            .llm
            .expect_generate_ingredient_advice()
            .returning(|_| {
                Box::pin(async { Err(CoreError::ExternalServiceError("model down".to_string())) })
            });
        mocks
            .products
            .expect_find_by_ingredients()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        mocks
            .ingredients
            .expect_find_by_names()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        mocks
            .marketplace
            .expect_search_by_ingredients()
            .times(1)
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));

        let response = mocks
            .into_service()
            .recommend(
                RecommendInput {
                    profile: raw_profile("dry", &["dehydration"]),
                },
                RequestContext::anonymous(),
            )
            .await
            .unwrap();

        assert!(!response.recommended_ingredients.is_empty());
        let allowed = [
            "hyaluronic acid",
            "ceramides",
            "squalane",
            "glycerin",
            "panthenol",
        ];
        for ingredient in &response.recommended_ingredients {
            assert!(allowed.contains(&ingredient.as_str()), "{ingredient}");
        }
        assert_eq!(response.meta.source, SynthesisSource::RulesOnly);
        assert!(!response.meta.saved);
        assert!(!response.routine.morning.is_empty());
        assert_eq!(
            serde_json::to_value(response.meta.source).unwrap(),
            json!("rules-only")
        );
    }

    #[tokio::test]
    async fn ai_candidates_lead_the_list_and_mark_the_source() {
        let mut mocks = Mocks::new();
        mocks
            .llm
            .expect_generate_ingredient_advice()
            .returning(|_| {
                Box::pin(async { Ok("```json\n[\"bakuchiol\", \"niacinamide\"]\n```".to_string()) })
            });
        mocks
            .products
            .expect_find_by_ingredients()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        mocks
            .ingredients
            .expect_find_by_names()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        mocks
            .marketplace
            .expect_search_by_ingredients()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));

        let response = mocks
            .into_service()
            .recommend(
                RecommendInput {
                    profile: raw_profile("oily", &[]),
                },
                RequestContext::anonymous(),
            )
            .await
            .unwrap();

        assert_eq!(response.recommended_ingredients[0], "bakuchiol");
        assert_eq!(response.meta.source, SynthesisSource::AiAssisted);
        assert_eq!(
            response
                .recommended_ingredients
                .iter()
                .filter(|i| i.as_str() == "niacinamide")
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn marketplace_is_skipped_when_catalog_matches_suffice() {
        let mut mocks = Mocks::new();
        mocks
            .llm
            .expect_generate_ingredient_advice()
            .returning(|_| {
                Box::pin(async { Err(CoreError::ExternalServiceError("timeout".to_string())) })
            });
        mocks.products.expect_find_by_ingredients().returning(|_| {
            Box::pin(async {
                Ok(vec![
                    product("Serum A", &["niacinamide"]),
                    product("Serum B", &["salicylic acid"]),
                    product("Serum C", &["zinc pca"]),
                ])
            })
        });
        mocks
            .ingredients
            .expect_find_by_names()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        mocks.marketplace.expect_search_by_ingredients().times(0);

        let response = mocks
            .into_service()
            .recommend(
                RecommendInput {
                    profile: raw_profile("oily", &[]),
                },
                RequestContext::anonymous(),
            )
            .await
            .unwrap();

        assert_eq!(response.matching_products.len(), 3);
        assert!(response.marketplace_links.is_empty());
    }

    #[tokio::test]
    async fn persistence_failure_still_returns_the_recommendation() {
        let mut mocks = Mocks::new();
        mocks
            .llm
            .expect_generate_ingredient_advice()
            .returning(|_| Box::pin(async { Ok("[\"niacinamide\"]".to_string()) }));
        mocks
            .products
            .expect_find_by_ingredients()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        mocks
            .ingredients
            .expect_find_by_names()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        mocks
            .marketplace
            .expect_search_by_ingredients()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        mocks
            .recommendations
            .expect_create()
            .returning(|_| Box::pin(async { Err(CoreError::InternalServerError) }));
        mocks.recommendations.expect_set_image_url().times(0);

        let ctx = RequestContext {
            user_id: Some(Uuid::new_v4()),
            plan_tier: PlanTier::Free,
        };
        let response = mocks
            .into_service()
            .recommend(
                RecommendInput {
                    profile: raw_profile("oily", &[]),
                },
                ctx,
            )
            .await
            .unwrap();

        assert!(!response.meta.saved);
        assert!(!response.recommended_ingredients.is_empty());
    }

    #[tokio::test]
    async fn image_findings_merge_into_a_defaulted_profile() {
        let mut mocks = Mocks::new();
        mocks.llm.expect_analyze_image().returning(|_, _| {
            Box::pin(async {
                Ok(json!({
                    "suggestedSkinType": "oily",
                    "detectedConcerns": ["acne"],
                    "observations": ["Visible shine across the t-zone."],
                    "confidence": 0.9,
                    "overallSkinScore": 62
                })
                .to_string())
            })
        });
        mocks
            .llm
            .expect_generate_ingredient_advice()
            .returning(|_| {
                Box::pin(async { Err(CoreError::ExternalServiceError("model down".to_string())) })
            });
        mocks
            .products
            .expect_find_by_ingredients()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        mocks
            .ingredients
            .expect_find_by_names()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        mocks
            .marketplace
            .expect_search_by_ingredients()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        mocks
            .recommendations
            .expect_create()
            .withf(|record| {
                record.source == Source::Image
                    && record.image_data.is_some()
                    && record.analysis_scores.is_some()
            })
            .returning(|record| Box::pin(async move { Ok(record) }));
        mocks
            .recommendations
            .expect_set_image_url()
            .withf(|record_id, image_url| *image_url == format!("/image/{record_id}"))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let ctx = RequestContext {
            user_id: Some(Uuid::new_v4()),
            plan_tier: PlanTier::Pro,
        };
        let response = mocks
            .into_service()
            .recommend_with_image(
                RecommendWithImageInput {
                    profile: RawProfileInput::default(),
                    image: Some(payload()),
                },
                ctx,
            )
            .await
            .unwrap();

        assert_eq!(response.profile.skin_type, "oily");
        assert!(response.profile.concerns.contains(&"acne".to_string()));
        assert!(response.meta.saved);
        let analysis = response.image_analysis.unwrap();
        assert_eq!(analysis.confidence, 0.9);
        let pro = response.pro_insights.unwrap();
        assert_eq!(pro.image_confidence, Some(0.9));
    }

    #[tokio::test]
    async fn explicit_skin_type_outranks_image_suggestion() {
        let mut mocks = Mocks::new();
        mocks.llm.expect_analyze_image().returning(|_, _| {
            Box::pin(async { Ok(json!({ "suggestedSkinType": "oily" }).to_string()) })
        });
        mocks
            .llm
            .expect_generate_ingredient_advice()
            .returning(|_| {
                Box::pin(async { Err(CoreError::ExternalServiceError("model down".to_string())) })
            });
        mocks
            .products
            .expect_find_by_ingredients()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        mocks
            .ingredients
            .expect_find_by_names()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        mocks
            .marketplace
            .expect_search_by_ingredients()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));

        let response = mocks
            .into_service()
            .recommend_with_image(
                RecommendWithImageInput {
                    profile: raw_profile("dry", &[]),
                    image: Some(payload()),
                },
                RequestContext::anonymous(),
            )
            .await
            .unwrap();

        assert_eq!(response.profile.skin_type, "dry");
    }

    #[tokio::test]
    async fn missing_image_is_rejected() {
        let mocks = Mocks::new();

        let result = mocks
            .into_service()
            .recommend_with_image(
                RecommendWithImageInput {
                    profile: raw_profile("oily", &[]),
                    image: None,
                },
                RequestContext::anonymous(),
            )
            .await;

        assert!(matches!(result, Err(CoreError::ImageRequired)));
    }

    #[tokio::test]
    async fn image_analysis_failure_degrades_to_defaults() {
        let mut mocks = Mocks::new();
        mocks
            .llm
            .expect_analyze_image()
            .returning(|_, _| {
                Box::pin(async { Err(CoreError::ExternalServiceError("vision down".to_string())) })
            });
        mocks
            .llm
            .expect_generate_ingredient_advice()
            .returning(|_| {
                Box::pin(async { Err(CoreError::ExternalServiceError("model down".to_string())) })
            });
        mocks
            .products
            .expect_find_by_ingredients()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        mocks
            .ingredients
            .expect_find_by_names()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        mocks
            .marketplace
            .expect_search_by_ingredients()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));

        let response = mocks
            .into_service()
            .recommend_with_image(
                RecommendWithImageInput {
                    profile: raw_profile("oily", &[]),
                    image: Some(payload()),
                },
                RequestContext::anonymous(),
            )
            .await
            .unwrap();

        assert_eq!(response.image_analysis, Some(ImageAnalysis::default()));
        assert!(!response.recommended_ingredients.is_empty());
    }

    #[tokio::test]
    async fn history_limit_defaults_and_clamps() {
        let user_id = Uuid::new_v4();

        let mut mocks = Mocks::new();
        mocks
            .recommendations
            .expect_get_by_user()
            .withf(|_, limit, source| *limit == DEFAULT_HISTORY_LIMIT && source.is_none())
            .times(1)
            .returning(|_, _, _| Box::pin(async { Ok(Vec::new()) }));
        let service = mocks.into_service();
        let page = service.get_history(user_id, None).await.unwrap();
        assert!(page.items.is_empty());

        let mut mocks = Mocks::new();
        mocks
            .recommendations
            .expect_get_by_user()
            .withf(|_, limit, _| *limit == MAX_HISTORY_LIMIT)
            .times(1)
            .returning(|_, _, _| Box::pin(async { Ok(Vec::new()) }));
        let service = mocks.into_service();
        service.get_history(user_id, Some(500)).await.unwrap();

        let mut mocks = Mocks::new();
        mocks
            .recommendations
            .expect_get_by_user()
            .withf(|_, limit, _| *limit == 1)
            .times(1)
            .returning(|_, _, _| Box::pin(async { Ok(Vec::new()) }));
        let service = mocks.into_service();
        service.get_history(user_id, Some(0)).await.unwrap();
    }

    #[tokio::test]
    async fn progress_image_requires_stored_bytes() {
        let record_id = Uuid::new_v4();

        let mut mocks = Mocks::new();
        mocks
            .recommendations
            .expect_get_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));
        let service = mocks.into_service();
        assert_eq!(service.get_progress_image(record_id).await.unwrap(), None);

        let mut mocks = Mocks::new();
        mocks.recommendations.expect_get_by_id().returning(|id| {
            Box::pin(async move {
                let mut record = RecommendationRecord::new(
                    Some(Uuid::new_v4()),
                    Source::Image,
                    SkinProfile::from_raw(&RawProfileInput::default()),
                    RecommendationSnapshot {
                        recommended_ingredients: Vec::new(),
                        routine: Default::default(),
                        synthesis_source: SynthesisSource::RulesOnly,
                    },
                    None,
                    None,
                    Some(b"jpeg bytes".to_vec()),
                    Some("image/png".to_string()),
                );
                record.id = id;
                Ok(Some(record))
            })
        });
        let service = mocks.into_service();
        let stored = service.get_progress_image(record_id).await.unwrap().unwrap();
        assert_eq!(stored.mime_type, "image/png");
        assert_eq!(stored.data, b"jpeg bytes".to_vec());
    }
}
