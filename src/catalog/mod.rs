//! Static stage catalog.
//!
//! The catalog is the fixed table of content-generation stages the engine
//! knows how to schedule: one template per module kind, plus the static
//! module-to-module dependency table. Both are defined at compile time and
//! never change at runtime.

use serde::{Deserialize, Serialize};

/// Marketing stage grouping, used by the planner heuristics and reporting.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StageCategory {
    Research,
    Ideation,
    Creation,
    Optimization,
    Review,
    Approval,
}

/// Closed set of content-generation modules the catalog can stage.
///
/// The kebab-case form of a kind (`sales-copy`) doubles as the node id of its
/// stage inside a workflow, since a workflow instantiates each module at most
/// once.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ModuleKind {
    MarketResearch,
    AudienceAnalysis,
    ContentStrategy,
    CampaignConcept,
    SalesCopy,
    VisualContent,
    VideoScript,
    SocialPosts,
    LandingPage,
    EmailCampaign,
    SeoOptimization,
    AnalyticsSetup,
    CampaignReview,
    LaunchApproval,
}

/// Static definition of one stage: everything the workflow builder needs to
/// instantiate a node.
#[derive(Debug, Clone)]
pub struct StageTemplate {
    pub module: ModuleKind,
    pub category: StageCategory,
    pub title: &'static str,
    /// nominal duration in seconds
    pub duration_secs: u64,
    /// labels of the artifacts this stage produces
    pub outputs: &'static [&'static str],
    /// label of the content-generation provider assigned to this stage
    pub provider: &'static str,
    /// prompt template with `{{goal}}` / `{{industry}}` / `{{audience}}` tokens
    pub prompt: &'static str,
}

static TEMPLATES: [StageTemplate; 14] = [
    StageTemplate {
        module: ModuleKind::MarketResearch,
        category: StageCategory::Research,
        title: "Market Research",
        duration_secs: 240,
        outputs: &["market-summary", "trend-report"],
        provider: "research-llm",
        prompt: "Research the current market landscape for {{goal}} in the {{industry}} space. Summarize demand signals, pricing norms, and three positioning gaps relevant to {{audience}}.",
    },
    StageTemplate {
        module: ModuleKind::AudienceAnalysis,
        category: StageCategory::Research,
        title: "Audience Analysis",
        duration_secs: 180,
        outputs: &["personas", "pain-points"],
        provider: "research-llm",
        prompt: "Profile {{audience}} for {{goal}}. Produce three buyer personas with their pain points, objections, and the channels where they spend attention.",
    },
    StageTemplate {
        module: ModuleKind::ContentStrategy,
        category: StageCategory::Ideation,
        title: "Content Strategy",
        duration_secs: 300,
        outputs: &["strategy-brief", "channel-plan"],
        provider: "strategy-llm",
        prompt: "Draft a content strategy for {{goal}} aimed at {{audience}}. Cover messaging pillars, channel mix, cadence, and a tone of voice that fits the {{industry}} market.",
    },
    StageTemplate {
        module: ModuleKind::CampaignConcept,
        category: StageCategory::Ideation,
        title: "Campaign Concept",
        duration_secs: 200,
        outputs: &["concept-board"],
        provider: "strategy-llm",
        prompt: "Propose two creative campaign concepts for {{goal}}, each with a hook, a visual direction, and the emotion it should trigger in {{audience}}.",
    },
    StageTemplate {
        module: ModuleKind::SalesCopy,
        category: StageCategory::Creation,
        title: "Sales Copy",
        duration_secs: 260,
        outputs: &["headlines", "body-copy", "cta-variants"],
        provider: "copy-llm",
        prompt: "Write conversion-focused sales copy for {{goal}}: five headline variants, long-form body copy, and three call-to-action lines tailored to {{audience}}.",
    },
    StageTemplate {
        module: ModuleKind::VisualContent,
        category: StageCategory::Creation,
        title: "Visual Content",
        duration_secs: 320,
        outputs: &["hero-image", "banner-set"],
        provider: "image-gen",
        prompt: "Generate a hero image brief and a banner set for {{goal}}, consistent with the campaign concept and legible at social-feed sizes for {{audience}}.",
    },
    StageTemplate {
        module: ModuleKind::VideoScript,
        category: StageCategory::Creation,
        title: "Video Script",
        duration_secs: 280,
        outputs: &["script", "shot-list"],
        provider: "video-gen",
        prompt: "Script a 45-second promotional video for {{goal}}: hook in the first three seconds, one concrete proof point, and a closing call to action for {{audience}}.",
    },
    StageTemplate {
        module: ModuleKind::SocialPosts,
        category: StageCategory::Creation,
        title: "Social Posts",
        duration_secs: 160,
        outputs: &["post-batch"],
        provider: "copy-llm",
        prompt: "Draft a week of social posts announcing {{goal}}. Vary the angle per post, keep platform character limits, and reuse the visual content where it fits.",
    },
    StageTemplate {
        module: ModuleKind::LandingPage,
        category: StageCategory::Creation,
        title: "Landing Page",
        duration_secs: 340,
        outputs: &["page-outline", "section-copy"],
        provider: "copy-llm",
        prompt: "Outline a landing page for {{goal}}: above-the-fold promise, social proof section, objection handling, and a single conversion goal for {{audience}}.",
    },
    StageTemplate {
        module: ModuleKind::EmailCampaign,
        category: StageCategory::Creation,
        title: "Email Campaign",
        duration_secs: 220,
        outputs: &["email-sequence"],
        provider: "email-gen",
        prompt: "Build a three-email sequence for {{goal}}: announcement, value deep-dive, and last-call. Subject lines under 50 characters, one idea per email.",
    },
    StageTemplate {
        module: ModuleKind::SeoOptimization,
        category: StageCategory::Optimization,
        title: "SEO Optimization",
        duration_secs: 200,
        outputs: &["keyword-map", "meta-copy"],
        provider: "seo-llm",
        prompt: "Optimize the produced copy for search: a keyword map for {{goal}} in the {{industry}} space, title tags, and meta descriptions that preserve the campaign voice.",
    },
    StageTemplate {
        module: ModuleKind::AnalyticsSetup,
        category: StageCategory::Optimization,
        title: "Analytics Setup",
        duration_secs: 140,
        outputs: &["tracking-plan"],
        provider: "analytics",
        prompt: "Define the measurement plan for {{goal}}: conversion events, UTM conventions per channel, and the weekly report the team should read.",
    },
    StageTemplate {
        module: ModuleKind::CampaignReview,
        category: StageCategory::Review,
        title: "Campaign Review",
        duration_secs: 120,
        outputs: &["review-notes"],
        provider: "review-llm",
        prompt: "Review every produced asset for {{goal}} against the strategy brief: consistency of message, claims that need evidence, and anything off-brand for {{audience}}.",
    },
    StageTemplate {
        module: ModuleKind::LaunchApproval,
        category: StageCategory::Approval,
        title: "Launch Approval",
        duration_secs: 60,
        outputs: &["approval-record"],
        provider: "review-llm",
        prompt: "Compile the launch checklist for {{goal}} and record a go/no-go recommendation with the open risks, if any.",
    },
];

/// Look up the template for a module kind.
pub fn template(module: ModuleKind) -> Option<&'static StageTemplate> {
    TEMPLATES.iter().find(|t| t.module == module)
}

/// Static module-to-module dependency table.
///
/// The workflow builder filters this down to the modules actually selected
/// for a workflow; entries referencing unselected modules simply drop out.
pub fn dependencies(module: ModuleKind) -> &'static [ModuleKind] {
    use ModuleKind::*;
    match module {
        MarketResearch => &[],
        AudienceAnalysis => &[MarketResearch],
        ContentStrategy => &[MarketResearch, AudienceAnalysis],
        CampaignConcept => &[AudienceAnalysis],
        SalesCopy => &[AudienceAnalysis, ContentStrategy],
        VisualContent => &[ContentStrategy, CampaignConcept],
        VideoScript => &[ContentStrategy, CampaignConcept],
        SocialPosts => &[ContentStrategy, VisualContent],
        LandingPage => &[ContentStrategy, SalesCopy],
        EmailCampaign => &[SalesCopy],
        SeoOptimization => &[SalesCopy, LandingPage],
        AnalyticsSetup => &[EmailCampaign, SocialPosts, LandingPage, SeoOptimization],
        CampaignReview => &[SalesCopy, VisualContent, VideoScript, SocialPosts, EmailCampaign, LandingPage, SeoOptimization],
        LaunchApproval => &[CampaignReview, SeoOptimization, EmailCampaign],
    }
}
