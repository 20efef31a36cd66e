//! Terminal rendering for hausdir-core types.

use hausdir_core::dataset::{Address, AreaWithRelations, BuildingWithRelations};
use hausdir_core::task::{Subtask, Task};
use owo_colors::OwoColorize;

/// Extension trait for colored terminal output.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Subtask {
    fn render(&self) -> String {
        let mark = match (self.done, self.unlocked) {
            (true, _) => "✓".green().to_string(),
            (false, true) => "○".to_string(),
            (false, false) => "○".dimmed().to_string(),
        };

        let title = if self.done {
            self.title.dimmed().to_string()
        } else {
            self.title.clone()
        };

        let hint = match &self.hint {
            Some(hint) => format!(" ({hint})").cyan().to_string(),
            None => String::new(),
        };

        let lock = if self.unlocked { "" } else { " [locked]" };

        format!("{mark} {title}{hint}{}", lock.dimmed())
    }
}

impl Render for Task {
    fn render(&self) -> String {
        let file = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (done, total) = self.subtask_progress();

        let progress = format!("[{done}/{total}]");
        let progress = if total > 0 && done == total {
            progress.green().to_string()
        } else {
            progress.yellow().to_string()
        };

        let title = if self.summary.raw.is_empty() {
            "(no summary)".dimmed().to_string()
        } else {
            self.summary.raw.bold().to_string()
        };

        format!("{progress} {title} {}", file.dimmed())
    }
}

impl Render for Address {
    fn render(&self) -> String {
        format!(
            "{} {}, {} {}",
            self.street, self.house_number, self.postal_code, self.city
        )
    }
}

impl Render for AreaWithRelations {
    fn render(&self) -> String {
        let category = self
            .category
            .as_ref()
            .map(|c| c.name.trim().to_string())
            .unwrap_or_else(|| format!("Typ {}", self.area.category_id));

        let mut lines = vec![format!(
            "🏠 {} {} {}",
            category.bold(),
            self.area.id.bold(),
            format!("({})", self.area.key()).dimmed()
        )];

        if let Some(address) = &self.address {
            lines.push(format!("   {}", address.render()));
        }

        let place: Vec<&str> = [self.area.entrance.as_str(), self.area.location.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        if !place.is_empty() {
            lines.push(format!("   {}", place.join(", ")));
        }

        for tenant in &self.tenants {
            let phone = if tenant.phone.is_empty() {
                String::new()
            } else {
                format!(" {}", tenant.phone.dimmed())
            };
            lines.push(format!("   👤 {}{}", tenant.name, phone));
        }

        lines.join("\n")
    }
}

impl Render for BuildingWithRelations {
    fn render(&self) -> String {
        let category = self
            .category
            .as_ref()
            .map(|c| c.name.trim().to_string())
            .unwrap_or_else(|| "Gebäude".to_string());

        let mut lines = vec![format!("🏢 {} {}", category.bold(), self.building.id.bold())];

        match &self.address {
            Some(address) => lines.push(format!("   {}", address.render())),
            None => lines.push("   (no address)".dimmed().to_string()),
        }

        if self.areas.is_empty() {
            lines.push("   No units".dimmed().to_string());
        }

        for area in &self.areas {
            lines.push(String::new());
            lines.extend(area.render().lines().map(|l| format!("   {l}")));
        }

        lines.join("\n")
    }
}
