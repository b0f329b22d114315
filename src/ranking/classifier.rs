//! Keyword-based relevance classification
//!
//! Two tiers:
//! - **Topical**: the candidate's text blob contains any topical keyword.
//! - **Commercial**: weighted score over commercial keywords (+2 each),
//!   business indicators (+1 each) and popularity signals, gated by topical
//!   relevance. `is_commercial` when the score reaches the threshold.
//!
//! Matching is case-insensitive substring containment over
//! `name description topics`.

use crate::discovery::Candidate;

/// Minimum commercial score (inclusive)
pub const COMMERCIAL_THRESHOLD: u32 = 3;

const COMMERCIAL_KEYWORD_WEIGHT: u32 = 2;
const BUSINESS_INDICATOR_WEIGHT: u32 = 1;
const POPULAR_STARS: u64 = 1_000;
const VERY_POPULAR_STARS: u64 = 5_000;
const FORK_RATIO_THRESHOLD: f64 = 0.1;
const FORK_RATIO_WEIGHT: u32 = 2;

pub const TOPICAL_KEYWORDS: &[&str] = &[
    "artificial intelligence",
    "machine learning",
    "deep learning",
    "neural network",
    "computer vision",
    "nlp",
    "natural language processing",
    "chatbot",
    "tensorflow",
    "pytorch",
    "llm",
    "gpt",
    "transformer",
    "reinforcement learning",
    "data science",
    "ai",
    "openai",
    "llama",
    "bert",
    "stable diffusion",
    "generative ai",
    "langchain",
    "keras",
    "scikit-learn",
    "pandas",
    "numpy",
    "opencv",
    "yolo",
    "cnn",
    "rnn",
    "lstm",
    "gan",
    "vae",
    "autoencoder",
    "embedding",
    "classification",
    "regression",
    "clustering",
    "recommendation",
    "speech recognition",
    "text mining",
    "sentiment analysis",
];

pub const COMMERCIAL_KEYWORDS: &[&str] = &[
    // automation
    "automation",
    "workflow",
    "n8n",
    "zapier",
    "automate",
    "pipeline",
    "scheduler",
    "cronjob",
    "webhook",
    "api automation",
    "workflow automation",
    // social media and content management
    "social media",
    "instagram",
    "twitter",
    "linkedin",
    "youtube",
    "tiktok",
    "facebook",
    "xiaohongshu",
    "weibo",
    "content management",
    "social automation",
    "post scheduler",
    "social media management",
    "content generator",
    "social bot",
    "mcp",
    // scraping and data collection
    "scraper",
    "crawler",
    "scraping",
    "data extraction",
    "web scraping",
    "reddit crawler",
    "news crawler",
    "price monitor",
    "data collection",
    "web automation",
    "selenium",
    "beautifulsoup",
    "scrapy",
    // e-commerce and sales
    "ecommerce",
    "shopify",
    "amazon",
    "product management",
    "inventory",
    "price tracking",
    "dropshipping",
    "affiliate",
    "marketing automation",
    "email marketing",
    "crm",
    "lead generation",
    "sales automation",
    // office and productivity
    "productivity",
    "office automation",
    "document processing",
    "pdf automation",
    "excel automation",
    "report generation",
    "business intelligence",
    "dashboard",
    "analytics",
    "metrics",
    "kpi",
    "monitoring",
    // messaging and support
    "chatbot",
    "customer service",
    "support bot",
    "telegram bot",
    "discord bot",
    "slack bot",
    "whatsapp",
    "wechat",
    "messaging",
    "notification",
    "alert",
    // content creation and media
    "content creation",
    "blog automation",
    "seo",
    "keyword research",
    "content generator",
    "video automation",
    "image processing",
    "thumbnail generator",
    "media converter",
    // finance and trading
    "trading",
    "crypto",
    "stock",
    "financial",
    "investment",
    "portfolio",
    "market data",
    "price alert",
    "trading bot",
    "arbitrage",
    // utilities
    "utility",
    "tool",
    "helper",
    "assistant",
    "generator",
    "converter",
    "validator",
    "formatter",
    "calculator",
    "manager",
    "organizer",
    "tracker",
];

pub const BUSINESS_INDICATORS: &[&str] = &[
    // business model
    "saas",
    "api",
    "service",
    "platform",
    "solution",
    "enterprise",
    "business",
    "commercial",
    "professional",
    "premium",
    "subscription",
    "freemium",
    // readiness
    "ready to use",
    "production ready",
    "plug and play",
    "easy setup",
    "one click",
    "no code",
    "low code",
    "drag and drop",
    "user friendly",
    "gui",
    "interface",
    // deployment and integration
    "docker",
    "kubernetes",
    "cloud",
    "aws",
    "azure",
    "google cloud",
    "deployment",
    "hosting",
    "server",
    "microservice",
    "rest api",
    "graphql",
];

/// Immutable keyword configuration injected into the classifier
#[derive(Debug, Clone)]
pub struct KeywordTables {
    pub topical: Vec<String>,
    pub commercial: Vec<String>,
    pub business: Vec<String>,
}

impl KeywordTables {
    pub fn new(topical: &[&str], commercial: &[&str], business: &[&str]) -> Self {
        let normalize =
            |words: &[&str]| -> Vec<String> { words.iter().map(|w| w.to_lowercase()).collect() };
        Self {
            topical: normalize(topical),
            commercial: normalize(commercial),
            business: normalize(business),
        }
    }
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self::new(TOPICAL_KEYWORDS, COMMERCIAL_KEYWORDS, BUSINESS_INDICATORS)
    }
}

/// Which classification gate a cycle applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassificationMode {
    #[default]
    Topical,
    Commercial,
}

/// Outcome of commercial classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationResult {
    pub is_topical: bool,
    pub commercial_score: u32,
    pub is_commercial: bool,
}

pub struct RelevanceClassifier {
    tables: KeywordTables,
}

impl RelevanceClassifier {
    pub fn new(tables: KeywordTables) -> Self {
        Self { tables }
    }

    pub fn with_defaults() -> Self {
        Self::new(KeywordTables::default())
    }

    pub fn tables(&self) -> &KeywordTables {
        &self.tables
    }

    fn blob_is_topical(&self, blob: &str) -> bool {
        self.tables.topical.iter().any(|k| blob.contains(k.as_str()))
    }

    pub fn classify_topical(&self, candidate: &Candidate) -> bool {
        self.blob_is_topical(&candidate.text_blob())
    }

    /// Score commercial relevance
    ///
    /// The score is computed for every candidate, but `is_commercial` is only
    /// ever true for topical ones. Every matching keyword counts, not just
    /// the first.
    pub fn classify_commercial(&self, candidate: &Candidate) -> ClassificationResult {
        let blob = candidate.text_blob();
        let is_topical = self.blob_is_topical(&blob);

        let mut score = 0;

        score += COMMERCIAL_KEYWORD_WEIGHT * count_matches(&self.tables.commercial, &blob);
        score += BUSINESS_INDICATOR_WEIGHT * count_matches(&self.tables.business, &blob);

        if candidate.stars > POPULAR_STARS {
            score += 1;
        }
        if candidate.stars > VERY_POPULAR_STARS {
            score += 1;
        }

        if candidate.stars > 0 {
            let fork_ratio = candidate.forks as f64 / candidate.stars as f64;
            if fork_ratio > FORK_RATIO_THRESHOLD {
                score += FORK_RATIO_WEIGHT;
            }
        }

        ClassificationResult {
            is_topical,
            commercial_score: score,
            is_commercial: is_topical && score >= COMMERCIAL_THRESHOLD,
        }
    }

    /// Keep topical candidates, preserving order
    pub fn filter_topical(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        let total = candidates.len();
        let kept: Vec<Candidate> = candidates
            .into_iter()
            .filter(|c| self.classify_topical(c))
            .collect();

        log::info!("Classified {} of {} candidates as topical", kept.len(), total);
        kept
    }

    /// Keep commercially relevant (and therefore topical) candidates, preserving order
    pub fn filter_commercial(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        let total = candidates.len();
        let kept: Vec<Candidate> = candidates
            .into_iter()
            .filter(|c| {
                let result = self.classify_commercial(c);
                log::debug!(
                    "{}: topical={} commercial_score={}",
                    c.full_name,
                    result.is_topical,
                    result.commercial_score
                );
                result.is_commercial
            })
            .collect();

        log::info!("Classified {} of {} candidates as commercial", kept.len(), total);
        kept
    }

    /// Apply the gate for `mode`
    pub fn filter(&self, mode: ClassificationMode, candidates: Vec<Candidate>) -> Vec<Candidate> {
        match mode {
            ClassificationMode::Topical => self.filter_topical(candidates),
            ClassificationMode::Commercial => self.filter_commercial(candidates),
        }
    }
}

fn count_matches(keywords: &[String], blob: &str) -> u32 {
    keywords.iter().filter(|k| blob.contains(k.as_str())).count() as u32
}
