//! Markdown graph report.

use std::collections::BTreeMap;

use crate::model::DocumentNode;
use crate::persistence::GraphSnapshot;

const TOP_NODES: usize = 20;
const TOP_REFERENCES: usize = 10;
const NAME_CHARS: usize = 30;

fn short(text: &str) -> String {
    text.chars().take(NAME_CHARS).collect()
}

/// First three names, then a count of the rest.
fn name_list(names: &[String]) -> String {
    let mut out = names.iter().take(3).cloned().collect::<Vec<_>>().join(", ");
    if names.len() > 3 {
        out.push_str(&format!(" 等{}个", names.len()));
    }
    out
}

fn by_desc<T>(items: &[T], key: impl Fn(&T) -> f64) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|a, b| key(b).total_cmp(&key(a)));
    sorted
}

fn flagged_list(out: &mut String, docs: &[&DocumentNode], empty: Option<&str>) {
    if docs.is_empty()
        && let Some(empty) = empty
    {
        out.push_str(&format!("{empty}\n"));
    }
    for doc in docs.iter().take(TOP_REFERENCES) {
        out.push_str(&format!(
            "- **{}**: 质量{:.1}, 重要性{:.3}\n",
            doc.file_name, doc.quality_score, doc.importance
        ));
    }
    out.push('\n');
}

impl GraphSnapshot {
    /// Render the graph report.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_markdown(&self, brand: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {brand} 文档知识图谱报告\n\n"));
        out.push_str(&format!("**生成时间**: {}\n\n", self.timestamp));

        out.push_str("## 📊 图谱统计\n\n");
        out.push_str(&format!("- **文档节点数**: {}\n", self.statistics.total_documents));
        out.push_str(&format!("- **概念节点数**: {}\n", self.statistics.total_concepts));
        out.push_str(&format!("- **边数**: {}\n\n", self.statistics.total_edges));

        out.push_str("## 📄 重要文档TOP20\n\n");
        out.push_str("| 排名 | 文档名称 | 分类 | 重要性 | 质量评分 | 中心性 |\n");
        out.push_str("|------|---------|------|--------|---------|--------|\n");
        for (rank, doc) in by_desc(&self.documents, |d| d.importance)
            .into_iter()
            .take(TOP_NODES)
            .enumerate()
        {
            out.push_str(&format!(
                "| {} | {} | {} | {:.3} | {:.1} | {:.0} |\n",
                rank + 1,
                short(&doc.file_name),
                doc.category,
                doc.importance,
                doc.quality_score,
                doc.centrality
            ));
        }
        out.push('\n');

        out.push_str("## 💡 重要概念TOP20\n\n");
        out.push_str("| 排名 | 概念名称 | 分类 | 频率 | 重要性 | 文档数 |\n");
        out.push_str("|------|---------|------|------|--------|--------|\n");
        for (rank, concept) in by_desc(&self.concepts, |c| c.importance)
            .into_iter()
            .take(TOP_NODES)
            .enumerate()
        {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {:.3} | {} |\n",
                rank + 1,
                concept.name,
                concept.category,
                concept.frequency,
                concept.importance,
                concept.documents.len()
            ));
        }
        out.push('\n');

        out.push_str("## 🔗 文档引用关系\n\n");
        out.push_str("### 被引用最多的文档TOP10\n\n");
        out.push_str("| 排名 | 文档名称 | 被引用次数 | 引用者 |\n");
        out.push_str("|------|---------|-----------|--------|\n");
        for (rank, doc) in by_desc(&self.documents, |d| d.referenced_by.len() as f64)
            .into_iter()
            .take(TOP_REFERENCES)
            .enumerate()
        {
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                rank + 1,
                short(&doc.file_name),
                doc.referenced_by.len(),
                name_list(&doc.referenced_by)
            ));
        }
        out.push('\n');

        out.push_str("### 引用最多的文档TOP10\n\n");
        out.push_str("| 排名 | 文档名称 | 引用次数 | 引用内容 |\n");
        out.push_str("|------|---------|---------|----------|\n");
        for (rank, doc) in by_desc(&self.documents, |d| d.references.len() as f64)
            .into_iter()
            .take(TOP_REFERENCES)
            .enumerate()
        {
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                rank + 1,
                short(&doc.file_name),
                doc.references.len(),
                name_list(&doc.references)
            ));
        }
        out.push('\n');

        out.push_str("## 📂 文档分类统计\n\n");
        out.push_str("| 分类 | 文档数 | 占比 |\n");
        out.push_str("|------|--------|------|\n");
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in &self.documents {
            *counts.entry(doc.category.as_str()).or_default() += 1;
        }
        let mut counts: Vec<(&str, usize)> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        let total = self.documents.len();
        for (category, count) in counts {
            let share = if total > 0 { count as f64 / total as f64 * 100.0 } else { 0.0 };
            out.push_str(&format!("| {category} | {count} | {share:.1}% |\n"));
        }
        out.push('\n');

        out.push_str("## 📈 质量与重要性分析\n\n");
        out.push_str("### 高质量高重要性文档\n\n");
        let strong: Vec<&DocumentNode> = self
            .documents
            .iter()
            .filter(|d| d.quality_score >= 80.0 && d.importance >= 0.5)
            .collect();
        flagged_list(&mut out, &strong, None);

        out.push_str("### 低质量高重要性文档（需优先改进）\n\n");
        let weak: Vec<&DocumentNode> = self
            .documents
            .iter()
            .filter(|d| d.quality_score < 70.0 && d.importance >= 0.5)
            .collect();
        flagged_list(&mut out, &weak, Some("无低质量高重要性文档"));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flagged_list_placeholder_only_when_empty() {
        let mut with_placeholder = String::new();
        flagged_list(&mut with_placeholder, &[], Some("无低质量高重要性文档"));
        assert_eq!(with_placeholder, "无低质量高重要性文档\n\n");

        let mut bare = String::new();
        flagged_list(&mut bare, &[], None);
        assert_eq!(bare, "\n");
    }
}
