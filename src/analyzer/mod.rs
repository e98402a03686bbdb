//! Goal analysis: maps a free-text campaign goal onto a stage module list.
//!
//! This is a lookup table, not an inference engine. Classification is
//! lowercased substring matching against a fixed keyword table; the first
//! category with a hit wins, and a goal with no hits falls back to the
//! `general` category with a minimal module list.

use serde::{Deserialize, Serialize};

use crate::catalog::ModuleKind;

/// Campaign category a goal is classified into.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GoalCategory {
    ProductLaunch,
    ContentMarketing,
    SocialMedia,
    BrandAwareness,
    LeadGeneration,
    General,
}

/// Coarse campaign complexity, derived from goal length and keyword density.
///
/// Also accepted as a generation preference: `simple` truncates the module
/// list, `advanced` adds the research and analytics bookends.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Complexity {
    Simple,
    Intermediate,
    Advanced,
}

/// Result of analyzing one goal string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalAnalysis {
    pub category: GoalCategory,
    pub complexity: Complexity,
    pub required_modules: Vec<ModuleKind>,
    pub estimated_scope: String,
}

/// Keyword table, checked in order; the first category with a hit wins.
const KEYWORDS: &[(GoalCategory, &[&str])] = &[
    (GoalCategory::ProductLaunch, &["launch", "product", "business"]),
    (GoalCategory::ContentMarketing, &["content", "blog", "article", "newsletter"]),
    (GoalCategory::SocialMedia, &["social", "instagram", "tiktok", "engagement"]),
    (GoalCategory::BrandAwareness, &["brand", "awareness", "identity"]),
    (GoalCategory::LeadGeneration, &["lead", "sales", "conversion", "funnel"]),
];

/// Fixed module list per category, in catalog execution order.
pub fn modules_for(category: GoalCategory) -> &'static [ModuleKind] {
    use ModuleKind::*;
    match category {
        GoalCategory::ProductLaunch => &[MarketResearch, AudienceAnalysis, ContentStrategy, SalesCopy, VisualContent, EmailCampaign, SeoOptimization, LaunchApproval],
        GoalCategory::ContentMarketing => &[AudienceAnalysis, ContentStrategy, SalesCopy, SocialPosts, SeoOptimization, CampaignReview],
        GoalCategory::SocialMedia => &[AudienceAnalysis, CampaignConcept, VisualContent, SocialPosts, CampaignReview],
        GoalCategory::BrandAwareness => &[MarketResearch, CampaignConcept, VisualContent, VideoScript, SocialPosts, CampaignReview],
        GoalCategory::LeadGeneration => &[AudienceAnalysis, ContentStrategy, LandingPage, EmailCampaign, SeoOptimization, AnalyticsSetup, CampaignReview],
        GoalCategory::General => &[ContentStrategy, SalesCopy, CampaignReview],
    }
}

/// Analyze a free-text goal.
///
/// Pure function: same goal in, same analysis out, no side effects.
pub fn analyze(goal: &str) -> GoalAnalysis {
    let lowered = goal.to_lowercase();

    let mut category = GoalCategory::General;
    let mut total_hits = 0usize;
    for (candidate, keywords) in KEYWORDS {
        let hits = keywords.iter().filter(|k| lowered.contains(*k)).count();
        if hits > 0 && category == GoalCategory::General {
            category = *candidate;
        }
        total_hits += hits;
    }

    let words = goal.split_whitespace().count();
    let complexity = if words > 12 || total_hits >= 3 {
        Complexity::Advanced
    } else if words < 5 && total_hits <= 1 {
        Complexity::Simple
    } else {
        Complexity::Intermediate
    };

    let required_modules = modules_for(category).to_vec();
    let estimated_scope = scope_label(required_modules.len());

    GoalAnalysis {
        category,
        complexity,
        required_modules,
        estimated_scope,
    }
}

fn scope_label(stages: usize) -> String {
    let label = match stages {
        0..=3 => "small",
        4..=6 => "medium",
        _ => "large",
    };
    format!("{} campaign ({} stages)", label, stages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_goal_maps_to_product_launch() {
        let analysis = analyze("Launch my new SaaS product");

        assert_eq!(analysis.category, GoalCategory::ProductLaunch);
        assert_eq!(
            analysis.required_modules,
            vec![
                ModuleKind::MarketResearch,
                ModuleKind::AudienceAnalysis,
                ModuleKind::ContentStrategy,
                ModuleKind::SalesCopy,
                ModuleKind::VisualContent,
                ModuleKind::EmailCampaign,
                ModuleKind::SeoOptimization,
                ModuleKind::LaunchApproval,
            ]
        );
    }

    #[test]
    fn test_every_launch_phrase_hits_the_same_category() {
        for goal in ["launch day", "our product page", "grow the business"] {
            assert_eq!(analyze(goal).category, GoalCategory::ProductLaunch);
        }
    }

    #[test]
    fn test_unmatched_goal_falls_back_to_general() {
        let analysis = analyze("make something people talk about");

        assert_eq!(analysis.category, GoalCategory::General);
        assert_eq!(analysis.complexity, Complexity::Intermediate);
        assert_eq!(analysis.required_modules.len(), 3);
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let goal = "Launch my new SaaS product for remote accounting teams";
        assert_eq!(analyze(goal), analyze(goal));
    }

    #[test]
    fn test_complexity_scales_with_goal_length() {
        assert_eq!(analyze("sell shoes").complexity, Complexity::Simple);
        assert_eq!(analyze("Launch my new SaaS product").complexity, Complexity::Intermediate);
        assert_eq!(
            analyze("Launch a new product line for our business with social content and lead conversion funnels everywhere").complexity,
            Complexity::Advanced
        );
    }

    #[test]
    fn test_scope_label_matches_module_count() {
        let analysis = analyze("Launch my new SaaS product");
        assert!(analysis.estimated_scope.contains("8 stages"));
        assert!(analysis.estimated_scope.starts_with("large"));
    }
}
