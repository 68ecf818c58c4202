//! Compiled-in catalog of reference architectures and draggable components.
//!
//! The catalog is immutable and loaded once: every architecture lists its
//! slots in display order together with the single correct component for
//! each slot. Components are the draggable palette entries.
//!
//! Invariants (checked by tests, relied on everywhere):
//! - slot ids are unique within an architecture
//! - every architecture has at least one slot
//! - component names are unique across the catalog
//! - every slot's `correct` value names a catalog component

/// A named position within an architecture requiring exactly one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Stable id used as the placement key (e.g. "dns").
    pub id: &'static str,
    /// Label shown on the empty slot (e.g. "DNS").
    pub label: &'static str,
    /// Name of the one component that verifies as correct here.
    pub correct: &'static str,
}

/// Workshop scenario shown next to the board for an architecture.
#[derive(Debug, Clone, Copy)]
pub struct UseCase {
    pub title: &'static str,
    pub scenario: &'static str,
    pub benefits: &'static str,
}

/// One reference architecture: ordered slots plus display metadata.
#[derive(Debug, Clone, Copy)]
pub struct Architecture {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub reference_url: &'static str,
    pub description: &'static str,
    pub use_case: UseCase,
    pub slots: &'static [Slot],
}

/// A draggable palette component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    pub name: &'static str,
    /// Icon path relative to the site root.
    pub icon: &'static str,
}

pub static ARCHITECTURES: &[Architecture] = &[
    Architecture {
        id: "serverless-web-app",
        name: "Serverless Web App",
        icon: "\u{1F680}",
        reference_url: "https://aws.amazon.com/architecture/reference-architecture-diagrams/?awsf.whitepapers-tech-category=tech-category%23serverless",
        description: "Serverless architecture using API Gateway, Lambda and DynamoDB",
        use_case: UseCase {
            title: "Online Booking System",
            scenario: "A hotel chain needs a booking system that scales automatically during high season without paying for idle servers in low season. Low operational cost and high availability are required.",
            benefits: "\u{2713} Pay per use \u{2713} Automatic scaling \u{2713} Zero server maintenance \u{2713} High availability",
        },
        slots: &[
            Slot { id: "api", label: "API Layer", correct: "API Gateway" },
            Slot { id: "compute", label: "Compute", correct: "Lambda" },
            Slot { id: "database", label: "Database", correct: "DynamoDB" },
        ],
    },
    Architecture {
        id: "microservices-platform",
        name: "Microservices Platform",
        icon: "\u{1F527}",
        reference_url: "https://aws.amazon.com/architecture/microservices/",
        description: "Microservices platform with containers and load balancing",
        use_case: UseCase {
            title: "E-commerce Platform",
            scenario: "An online store needs to split its services (catalog, cart, payments, inventory) so independent teams can develop and deploy without affecting each other, scaling each service on demand.",
            benefits: "\u{2713} Independent deployment \u{2713} Per-service scaling \u{2713} Resilience \u{2713} Heterogeneous stacks",
        },
        slots: &[
            Slot { id: "loadbalancer", label: "Load Balancer", correct: "ALB" },
            Slot { id: "container", label: "Container Service", correct: "ECS" },
            Slot { id: "database", label: "Database", correct: "RDS" },
            Slot { id: "cache", label: "Cache", correct: "ElastiCache" },
        ],
    },
    Architecture {
        id: "static-website",
        name: "Static Website",
        icon: "\u{1F4F1}",
        reference_url: "https://aws.amazon.com/getting-started/hands-on/host-static-website/",
        description: "Static website with CDN and S3 storage",
        use_case: UseCase {
            title: "Global Corporate Portal",
            scenario: "A corporate website (HTML, CSS, JS) must be served across multiple regions with ultra-fast content delivery, SSL and minimal hosting cost. Content is mostly static with occasional updates.",
            benefits: "\u{2713} Global distribution \u{2713} Ultra low cost \u{2713} High speed \u{2713} HTTPS included",
        },
        slots: &[
            Slot { id: "dns", label: "DNS", correct: "Route 53" },
            Slot { id: "cdn", label: "CDN", correct: "CloudFront" },
            Slot { id: "storage", label: "Storage", correct: "S3" },
        ],
    },
    Architecture {
        id: "data-pipeline",
        name: "Data Pipeline",
        icon: "\u{1F4CA}",
        reference_url: "https://aws.amazon.com/architecture/analytics-big-data/",
        description: "Data pipeline with serverless processing and streaming",
        use_case: UseCase {
            title: "Real-Time IoT Analytics",
            scenario: "A logistics company has 10,000 truck sensors sending readings every second (temperature, location, fuel). The stream must be processed in real time, stored for historical analysis and rolled up into executive reports.",
            benefits: "\u{2713} Real-time processing \u{2713} Scalable storage \u{2713} Advanced analytics \u{2713} Low cost",
        },
        slots: &[
            Slot { id: "source", label: "Data Source", correct: "S3" },
            Slot { id: "processing", label: "Processing", correct: "Lambda" },
            Slot { id: "streaming", label: "Streaming", correct: "Kinesis" },
            Slot { id: "warehouse", label: "Data Warehouse", correct: "Redshift" },
        ],
    },
    Architecture {
        id: "three-tier-application",
        name: "Three-Tier Application",
        icon: "\u{1F3D7}",
        reference_url: "https://docs.aws.amazon.com/whitepapers/latest/aws-overview/three-tier-architecture.html",
        description: "Classic three-tier application with load balancer, compute and database",
        use_case: UseCase {
            title: "Enterprise ERP System",
            scenario: "A manufacturer is migrating a legacy ERP to the cloud. The application needs high availability, load balancing across multiple servers, a relational database with automatic backups and room to grow with its user base.",
            benefits: "\u{2713} High availability \u{2713} Layer separation \u{2713} Controlled scaling \u{2713} Automatic backups",
        },
        slots: &[
            Slot { id: "loadbalancer", label: "Load Balancer", correct: "ELB" },
            Slot { id: "compute", label: "Compute", correct: "EC2" },
            Slot { id: "database", label: "Database", correct: "RDS" },
        ],
    },
];

pub static COMPONENTS: &[Component] = &[
    Component { name: "API Gateway", icon: "icons/api-gateway.png" },
    Component { name: "Lambda", icon: "icons/lambda.png" },
    Component { name: "DynamoDB", icon: "icons/dynamodb.png" },
    Component { name: "ALB", icon: "icons/alb.png" },
    Component { name: "ECS", icon: "icons/ecs.png" },
    Component { name: "RDS", icon: "icons/rds.png" },
    Component { name: "ElastiCache", icon: "icons/elasticache.png" },
    Component { name: "Route 53", icon: "icons/route53.png" },
    Component { name: "CloudFront", icon: "icons/cloudfront.png" },
    Component { name: "S3", icon: "icons/s3.png" },
    Component { name: "Kinesis", icon: "icons/kinesis.png" },
    Component { name: "Redshift", icon: "icons/redshift.png" },
    Component { name: "ELB", icon: "icons/elb.png" },
    Component { name: "EC2", icon: "icons/ec2.png" },
];

/// Look up an architecture by catalog index.
pub fn architecture(index: usize) -> Option<&'static Architecture> {
    ARCHITECTURES.get(index)
}

/// Look up a palette component by exact name.
pub fn find_component(name: &str) -> Option<&'static Component> {
    COMPONENTS.iter().find(|c| c.name == name)
}

impl Architecture {
    /// Find a slot of this architecture by id.
    pub fn slot(&self, slot_id: &str) -> Option<&'static Slot> {
        self.slots.iter().find(|s| s.id == slot_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_five_architectures() {
        assert_eq!(ARCHITECTURES.len(), 5);
    }

    #[test]
    fn slot_ids_unique_within_each_architecture() {
        for arch in ARCHITECTURES {
            let ids: HashSet<&str> = arch.slots.iter().map(|s| s.id).collect();
            assert_eq!(ids.len(), arch.slots.len(), "{}", arch.name);
        }
    }

    #[test]
    fn every_architecture_has_slots() {
        for arch in ARCHITECTURES {
            assert!(!arch.slots.is_empty(), "{}", arch.name);
        }
    }

    #[test]
    fn component_names_unique() {
        let names: HashSet<&str> = COMPONENTS.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), COMPONENTS.len());
    }

    #[test]
    fn every_correct_answer_is_a_catalog_component() {
        for arch in ARCHITECTURES {
            for slot in arch.slots {
                assert!(
                    find_component(slot.correct).is_some(),
                    "{} / {} names unknown component {}",
                    arch.name,
                    slot.id,
                    slot.correct
                );
            }
        }
    }

    #[test]
    fn static_website_expected_mapping() {
        let arch = ARCHITECTURES.iter().find(|a| a.name == "Static Website").unwrap();
        assert_eq!(arch.slot("dns").unwrap().correct, "Route 53");
        assert_eq!(arch.slot("cdn").unwrap().correct, "CloudFront");
        assert_eq!(arch.slot("storage").unwrap().correct, "S3");
    }

    #[test]
    fn architecture_lookup_by_index() {
        assert_eq!(architecture(0).unwrap().name, "Serverless Web App");
        assert!(architecture(99).is_none());
    }

    #[test]
    fn component_lookup_is_exact() {
        assert!(find_component("Lambda").is_some());
        assert!(find_component("lambda").is_none());
        assert!(find_component("Fargate").is_none());
    }
}
