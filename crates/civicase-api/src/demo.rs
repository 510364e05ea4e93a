//! Self-contained demo backends
//!
//! An in-memory similarity index over a small seeded corpus and a
//! deterministic template generator. They let the server run end-to-end
//! without external services; production deployments swap in real
//! [`SemanticIndex`] and [`Generator`] implementations.

use async_trait::async_trait;

use civicase_core::{
    Category, Generator, GeneratorError, IndexHit, IndexScope, IndexUnreachable, SemanticIndex,
};

/// One indexed document with its category tag and stored metadata.
#[derive(Debug, Clone)]
pub struct DemoDoc {
    pub id: &'static str,
    pub text: &'static str,
    pub category: Category,
    pub metadata: &'static [(&'static str, &'static str)],
}

/// Similarity index over an in-memory corpus.
///
/// Scoring is character-bigram overlap between the query and the document
/// text, boosted when the document's category matches the query scope.
pub struct InMemoryIndex {
    docs: Vec<DemoDoc>,
}

impl InMemoryIndex {
    pub fn new(docs: Vec<DemoDoc>) -> Self {
        InMemoryIndex { docs }
    }

    pub fn seeded_cases() -> Self {
        InMemoryIndex::new(vec![
            DemoDoc {
                id: "case-digital-001",
                text: "某街道开设老年人智能手机课堂，志愿者每周教学健康码与网上挂号",
                category: Category::DigitalDivide,
                metadata: &[
                    ("outcome", "参加老人超过两百人，独立使用率明显提升"),
                    ("measures", "每周课堂;志愿者结对;发放图文手册"),
                ],
            },
            DemoDoc {
                id: "case-digital-002",
                text: "社区青年志愿者与独居老人结对，上门辅导智能手机基本操作",
                category: Category::DigitalDivide,
                metadata: &[("outcome", "独居老人基本掌握视频通话与线上缴费")],
            },
            DemoDoc {
                id: "case-parking-001",
                text: "老旧小区重新划定车位并引入错时共享停车，缓解夜间停车难",
                category: Category::ParkingManagement,
                metadata: &[
                    ("outcome", "夜间乱停车现象基本消除"),
                    ("measures", "重新划线;错时共享;周边单位开放车位"),
                ],
            },
            DemoDoc {
                id: "case-elder-001",
                text: "社区建设老年食堂与日间照料中心，统一配餐上门服务",
                category: Category::ElderCare,
                metadata: &[("outcome", "高龄老人就餐与照护问题得到缓解")],
            },
            DemoDoc {
                id: "case-env-001",
                text: "推行垃圾分类积分制，居民投放正确可兑换生活用品",
                category: Category::EnvironmentGovernance,
                metadata: &[("outcome", "分类准确率大幅度提高")],
            },
            DemoDoc {
                id: "case-dispute-001",
                text: "楼上漏水引发邻里纠纷，社区调解员组织双方协商并引入物业维修",
                category: Category::NeighborDispute,
                metadata: &[("outcome", "双方达成赔偿协议，恢复邻里关系")],
            },
        ])
    }

    pub fn seeded_policies() -> Self {
        InMemoryIndex::new(vec![
            DemoDoc {
                id: "policy-digital-001",
                text: "关于切实解决老年人运用智能技术困难的实施方案，要求保留线下服务渠道并开展智能技术培训",
                category: Category::DigitalDivide,
                metadata: &[
                    ("citation", "国办发〔2020〕45号"),
                    ("admin_level", "central"),
                ],
            },
            DemoDoc {
                id: "policy-elder-001",
                text: "推进社区居家养老服务体系建设，支持日间照料与助餐服务",
                category: Category::ElderCare,
                metadata: &[("citation", "某省养老服务条例第12条"), ("admin_level", "provincial")],
            },
            DemoDoc {
                id: "policy-parking-001",
                text: "城市停车设施管理办法，鼓励错时共享与老旧小区车位改造",
                category: Category::ParkingManagement,
                metadata: &[("citation", "某市停车管理办法第8条"), ("admin_level", "municipal")],
            },
            DemoDoc {
                id: "policy-env-001",
                text: "生活垃圾分类管理条例，明确社区宣传与定点投放责任",
                category: Category::EnvironmentGovernance,
                metadata: &[("citation", "某市垃圾分类条例第5条"), ("admin_level", "municipal")],
            },
        ])
    }

    fn matches_scope(doc: &DemoDoc, scope: Option<&IndexScope>) -> bool {
        match scope {
            None => true,
            Some(IndexScope::Category(category)) => doc.category == *category,
            Some(IndexScope::Keywords(terms)) => {
                terms.iter().any(|t| doc.text.contains(t.as_str()))
                    || terms.is_empty()
            }
        }
    }
}

#[async_trait]
impl SemanticIndex for InMemoryIndex {
    async fn query(
        &self,
        text: &str,
        scope: Option<&IndexScope>,
        top_k: usize,
    ) -> Result<Vec<IndexHit>, IndexUnreachable> {
        let mut hits: Vec<IndexHit> = self
            .docs
            .iter()
            .filter(|doc| Self::matches_scope(doc, scope))
            .map(|doc| {
                // Scoped matches start above the default relevance floor so
                // a category-tagged corpus always yields usable context.
                let base = if scope.is_some() { 0.5 } else { 0.0 };
                let score = base + 0.5 * bigram_overlap(text, doc.text);
                let mut hit = IndexHit::new(doc.id, doc.text, score.min(1.0));
                for (key, value) in doc.metadata {
                    hit = hit.with_meta(*key, *value);
                }
                hit
            })
            .collect();

        hits.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(top_k);
        Ok(hits)
    }
}

/// Fraction of query character-bigrams that also occur in the document.
fn bigram_overlap(query: &str, doc: &str) -> f64 {
    let q: Vec<char> = query.chars().filter(|c| !c.is_whitespace()).collect();
    if q.len() < 2 {
        return 0.0;
    }
    let bigrams: Vec<String> = q.windows(2).map(|w| w.iter().collect()).collect();
    let matched = bigrams.iter().filter(|b| doc.contains(b.as_str())).count();
    matched as f64 / bigrams.len() as f64
}

/// Deterministic generator that assembles a structured plan from the
/// rendered context. Stands in for a hosted language model.
pub struct TemplateGenerator;

#[async_trait]
impl Generator for TemplateGenerator {
    async fn generate(&self, context: &str, n: usize) -> Result<Vec<String>, GeneratorError> {
        let cites_cases = !context.contains("(no precedent cases matched)");
        let cites_policies = !context.contains("(no policy clauses matched)");

        Ok((1..=n)
            .map(|i| {
                let mut plan = format!(
                    "方案{i}：第一阶段开展入户摸底，明确需求与资源缺口；\
                     第二阶段组织社区力量落实整改，明确人员与预算分工；\
                     第三阶段建立长效机制，定期回访并持续监督。"
                );
                if cites_cases {
                    plan.push_str("借鉴相似社区的成功做法推进实施。");
                }
                if cites_policies {
                    plan.push_str("相关措施依据现行政策文件执行。");
                }
                plan
            })
            .collect())
    }
}
