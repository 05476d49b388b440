//! Static catalog of architectural patterns.
//!
//! Each entry carries descriptive metadata plus the per-criterion
//! coefficients (0-100) consumed by the decision matrix.

use super::{Criterion, PatternCatalog};

/// Recommended technologies for one layer of a pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TechRecommendation {
    pub layer: &'static str,
    pub options: &'static [&'static str],
}

/// Static description of an architectural pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternProfile {
    /// Lookup key (snake_case).
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    pub description: &'static str,
    pub best_for: &'static [&'static str],
    pub pros: &'static [&'static str],
    pub cons: &'static [&'static str],
    /// Per-criterion coefficients. A criterion missing here is scored as neutral.
    pub scoring: &'static [(Criterion, f64)],
    pub tech_recommendations: &'static [TechRecommendation],
}

impl PatternProfile {
    /// Coefficient for a criterion, if the pattern defines one.
    pub fn coefficient(&self, criterion: Criterion) -> Option<f64> {
        self.scoring
            .iter()
            .find(|(c, _)| *c == criterion)
            .map(|(_, value)| *value)
    }
}

/// The built-in pattern catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticKnowledgeBase;

impl StaticKnowledgeBase {
    pub fn new() -> Self {
        Self
    }
}

impl PatternCatalog for StaticKnowledgeBase {
    fn lookup_pattern(&self, name: &str) -> Option<&PatternProfile> {
        let key = normalize_pattern_key(name);
        PATTERNS.iter().find(|p| p.key == key)
    }

    fn all_pattern_names(&self) -> Vec<&str> {
        PATTERNS.iter().map(|p| p.key).collect()
    }
}

/// Lower-cases a pattern name and replaces spaces with underscores.
pub fn normalize_pattern_key(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

static PATTERNS: &[PatternProfile] = &[
    PatternProfile {
        key: "monolith",
        name: "Monolith",
        description: "Single deployable unit containing all application logic.",
        best_for: &[
            "Small to medium applications",
            "Early-stage startups / MVPs",
            "Teams under 10 developers",
            "Simple business domains",
        ],
        pros: &[
            "Simple development and deployment",
            "Easy debugging and testing",
            "Lower operational overhead",
            "No network latency between components",
            "Faster time to market",
        ],
        cons: &[
            "Harder to scale specific components",
            "Technology lock-in",
            "Longer build times as app grows",
            "Single point of failure",
            "Team coupling issues at scale",
        ],
        scoring: &[
            (Criterion::TimeToMarket, 95.0),
            (Criterion::Cost, 90.0),
            (Criterion::Scale, 30.0),
            (Criterion::Reliability, 50.0),
            (Criterion::Security, 60.0),
        ],
        tech_recommendations: &[
            TechRecommendation {
                layer: "backend",
                options: &["Python/Django", "Node.js/Express", "Ruby on Rails", "Laravel"],
            },
            TechRecommendation {
                layer: "database",
                options: &["PostgreSQL", "MySQL", "SQLite"],
            },
            TechRecommendation {
                layer: "deployment",
                options: &["Render", "Heroku", "Railway", "DigitalOcean App Platform"],
            },
        ],
    },
    PatternProfile {
        key: "modular_monolith",
        name: "Modular Monolith",
        description: "Single deployment with well-defined internal module boundaries.",
        best_for: &[
            "Medium applications planning for growth",
            "Teams 10-30 developers",
            "Complex domains needing structure",
            "Preparing for future microservices",
        ],
        pros: &[
            "Simplicity of one deployment with internal structure",
            "Clear module boundaries",
            "Easier transition to microservices later",
            "Good for medium-sized teams",
            "Maintains deployment simplicity",
        ],
        cons: &[
            "Requires discipline to maintain boundaries",
            "Still single deployment unit",
            "Can devolve into regular monolith",
            "Module coupling can creep in",
        ],
        scoring: &[
            (Criterion::TimeToMarket, 80.0),
            (Criterion::Cost, 85.0),
            (Criterion::Scale, 50.0),
            (Criterion::Reliability, 60.0),
            (Criterion::Security, 65.0),
        ],
        tech_recommendations: &[
            TechRecommendation {
                layer: "backend",
                options: &["Python/FastAPI", "Java/Spring Boot", "C#/.NET Core", "Go"],
            },
            TechRecommendation {
                layer: "database",
                options: &["PostgreSQL", "MySQL"],
            },
            TechRecommendation {
                layer: "deployment",
                options: &["Render", "AWS ECS", "Google Cloud Run"],
            },
        ],
    },
    PatternProfile {
        key: "microservices",
        name: "Microservices",
        description: "Distributed system of independently deployable services.",
        best_for: &[
            "Large-scale applications",
            "Teams 30+ developers",
            "Different scaling needs per component",
            "Polyglot technology requirements",
        ],
        pros: &[
            "Independent deployment and scaling",
            "Technology flexibility per service",
            "Team autonomy",
            "Fault isolation",
            "Easier to understand individual services",
        ],
        cons: &[
            "High operational complexity",
            "Network latency and failures",
            "Data consistency challenges",
            "Requires mature DevOps practices",
            "Higher infrastructure costs",
        ],
        scoring: &[
            (Criterion::TimeToMarket, 40.0),
            (Criterion::Cost, 35.0),
            (Criterion::Scale, 95.0),
            (Criterion::Reliability, 80.0),
            (Criterion::Security, 75.0),
        ],
        tech_recommendations: &[
            TechRecommendation {
                layer: "backend",
                options: &["Node.js", "Go", "Python/FastAPI", "Java/Spring Boot"],
            },
            TechRecommendation {
                layer: "database",
                options: &["PostgreSQL", "MongoDB", "Redis"],
            },
            TechRecommendation {
                layer: "messaging",
                options: &["RabbitMQ", "Apache Kafka", "AWS SQS"],
            },
            TechRecommendation {
                layer: "deployment",
                options: &["Kubernetes", "AWS ECS", "Google GKE"],
            },
        ],
    },
    PatternProfile {
        key: "serverless",
        name: "Serverless",
        description: "Event-driven functions with auto-scaling and pay-per-use.",
        best_for: &[
            "Variable/unpredictable workloads",
            "Event-driven applications",
            "Cost optimization for low traffic",
            "Quick prototypes and MVPs",
        ],
        pros: &[
            "Pay only for actual usage",
            "Auto-scaling out of the box",
            "No server management",
            "Great for sporadic workloads",
            "Fast deployment of functions",
        ],
        cons: &[
            "Cold start latency",
            "Vendor lock-in",
            "Limited execution time",
            "Complex debugging",
            "Expensive at high scale",
        ],
        scoring: &[
            (Criterion::TimeToMarket, 85.0),
            (Criterion::Cost, 70.0),
            (Criterion::Scale, 85.0),
            (Criterion::Reliability, 70.0),
            (Criterion::Security, 65.0),
        ],
        tech_recommendations: &[
            TechRecommendation {
                layer: "compute",
                options: &[
                    "AWS Lambda",
                    "Google Cloud Functions",
                    "Vercel Functions",
                    "Cloudflare Workers",
                ],
            },
            TechRecommendation {
                layer: "database",
                options: &["DynamoDB", "Firestore", "PlanetScale", "Supabase"],
            },
            TechRecommendation {
                layer: "deployment",
                options: &["Serverless Framework", "SST", "Pulumi"],
            },
        ],
    },
    PatternProfile {
        key: "event_driven",
        name: "Event-Driven Architecture",
        description: "Loosely coupled services communicating through events.",
        best_for: &[
            "Real-time processing needs",
            "Complex workflows",
            "Audit trail requirements",
            "Decoupled integrations",
        ],
        pros: &[
            "High decoupling between services",
            "Natural audit trail",
            "Easy to add new consumers",
            "Resilient to failures",
            "Supports complex workflows",
        ],
        cons: &[
            "Eventual consistency complexity",
            "Debugging distributed flows",
            "Message ordering challenges",
            "Requires robust monitoring",
            "Learning curve",
        ],
        scoring: &[
            (Criterion::TimeToMarket, 50.0),
            (Criterion::Cost, 55.0),
            (Criterion::Scale, 90.0),
            (Criterion::Reliability, 85.0),
            (Criterion::Security, 70.0),
        ],
        tech_recommendations: &[
            TechRecommendation {
                layer: "messaging",
                options: &["Apache Kafka", "RabbitMQ", "AWS EventBridge", "Redis Streams"],
            },
            TechRecommendation {
                layer: "backend",
                options: &["Node.js", "Python", "Go"],
            },
            TechRecommendation {
                layer: "database",
                options: &["PostgreSQL", "MongoDB", "EventStoreDB"],
            },
        ],
    },
    PatternProfile {
        key: "cqrs",
        name: "CQRS (Command Query Responsibility Segregation)",
        description: "Separate models for reading and writing data.",
        best_for: &[
            "Complex domains with different read/write patterns",
            "High-read applications",
            "Event sourcing scenarios",
            "Audit and compliance requirements",
        ],
        pros: &[
            "Optimized read and write models",
            "Better performance for read-heavy apps",
            "Natural fit for event sourcing",
            "Scalable independently",
            "Clear separation of concerns",
        ],
        cons: &[
            "Increased complexity",
            "Eventual consistency",
            "More code to maintain",
            "Steeper learning curve",
            "Overkill for simple apps",
        ],
        scoring: &[
            (Criterion::TimeToMarket, 35.0),
            (Criterion::Cost, 45.0),
            (Criterion::Scale, 85.0),
            (Criterion::Reliability, 80.0),
            (Criterion::Security, 80.0),
        ],
        tech_recommendations: &[
            TechRecommendation {
                layer: "backend",
                options: &["C#/.NET", "Java/Axon", "Python/eventsourcing"],
            },
            TechRecommendation {
                layer: "database (write)",
                options: &["PostgreSQL", "EventStoreDB"],
            },
            TechRecommendation {
                layer: "database (read)",
                options: &["Elasticsearch", "Redis", "MongoDB"],
            },
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_patterns_in_declaration_order() {
        let kb = StaticKnowledgeBase::new();
        assert_eq!(
            kb.all_pattern_names(),
            vec![
                "monolith",
                "modular_monolith",
                "microservices",
                "serverless",
                "event_driven",
                "cqrs"
            ]
        );
    }

    #[test]
    fn lookup_normalizes_display_style_names() {
        let kb = StaticKnowledgeBase::new();
        let pattern = kb.lookup_pattern("Modular Monolith").unwrap();
        assert_eq!(pattern.key, "modular_monolith");
    }

    #[test]
    fn lookup_unknown_pattern_returns_none() {
        let kb = StaticKnowledgeBase::new();
        assert!(kb.lookup_pattern("blockchain_mesh").is_none());
    }

    #[test]
    fn every_pattern_rates_every_criterion_within_bounds() {
        for pattern in PATTERNS {
            for criterion in Criterion::ALL {
                let value = pattern.coefficient(criterion).unwrap();
                assert!((0.0..=100.0).contains(&value), "{} {:?}", pattern.key, criterion);
            }
        }
    }

    #[test]
    fn microservices_coefficients_match_catalog() {
        let kb = StaticKnowledgeBase::new();
        let ms = kb.lookup_pattern("microservices").unwrap();
        assert_eq!(ms.coefficient(Criterion::Scale), Some(95.0));
        assert_eq!(ms.coefficient(Criterion::Cost), Some(35.0));
    }
}
