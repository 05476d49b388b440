//! The final architecture blueprint.

use serde::{Deserialize, Serialize};

/// A building block of the recommended system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintComponent {
    pub name: String,
    #[serde(default)]
    pub responsibility: String,
}

/// Technology options for one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechStackEntry {
    pub layer: String,
    #[serde(default)]
    pub options: Vec<String>,
}

/// The deliverable of a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blueprint {
    /// Catalog key of the recommended pattern.
    pub pattern: String,
    pub pattern_name: String,
    pub overview: String,
    pub components: Vec<BlueprintComponent>,
    pub tech_stack: Vec<TechStackEntry>,
    pub risks: Vec<String>,
    pub next_steps: Vec<String>,
}

impl Blueprint {
    /// Renders the blueprint as a markdown document.
    pub fn to_markdown(&self) -> String {
        let mut out = vec![
            format!("# Architecture Blueprint: {}", self.pattern_name),
            String::new(),
            self.overview.clone(),
        ];

        if !self.components.is_empty() {
            out.push(String::new());
            out.push("## Components".to_string());
            for c in &self.components {
                if c.responsibility.is_empty() {
                    out.push(format!("- **{}**", c.name));
                } else {
                    out.push(format!("- **{}**: {}", c.name, c.responsibility));
                }
            }
        }

        if !self.tech_stack.is_empty() {
            out.push(String::new());
            out.push("## Tech Stack".to_string());
            for entry in &self.tech_stack {
                out.push(format!("- **{}**: {}", entry.layer, entry.options.join(", ")));
            }
        }

        for (title, items) in [("Risks", &self.risks), ("Next Steps", &self.next_steps)] {
            if items.is_empty() {
                continue;
            }
            out.push(String::new());
            out.push(format!("## {}", title));
            out.extend(items.iter().map(|item| format!("- {}", item)));
        }

        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_includes_populated_sections_only() {
        let blueprint = Blueprint {
            pattern: "monolith".to_string(),
            pattern_name: "Monolith".to_string(),
            overview: "One deployable.".to_string(),
            components: vec![BlueprintComponent {
                name: "Web app".to_string(),
                responsibility: "Serves everything".to_string(),
            }],
            tech_stack: vec![TechStackEntry {
                layer: "database".to_string(),
                options: vec!["PostgreSQL".to_string(), "SQLite".to_string()],
            }],
            risks: vec![],
            next_steps: vec!["Set up CI".to_string()],
        };

        let md = blueprint.to_markdown();

        assert!(md.starts_with("# Architecture Blueprint: Monolith"));
        assert!(md.contains("- **Web app**: Serves everything"));
        assert!(md.contains("- **database**: PostgreSQL, SQLite"));
        assert!(!md.contains("## Risks"));
        assert!(md.contains("## Next Steps\n- Set up CI"));
    }
}
