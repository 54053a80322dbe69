use colored::*;

use super::utils::parse_severity;
use crate::compliance::policies::{Policy, list_policies};
use crate::compliance::Severity;

/// List catalog policies, optionally narrowed by category substring and severity.
pub fn handle_policies(
    category: Option<String>,
    severity: Option<String>,
    json: bool,
) -> crate::Result<()> {
    let severity = severity.as_deref().map(parse_severity).transpose()?;
    let policies = list_policies(category.as_deref(), severity);

    if json {
        println!("{}", serde_json::to_string_pretty(&policies)?);
        return Ok(());
    }

    if policies.is_empty() {
        println!("No policies match the given filters.");
        return Ok(());
    }

    for (name, group) in group_policies(&policies) {
        println!("\n{}", name.bold().underline());
        for policy in group {
            println!(
                "  {:<22} {:<10} {}",
                policy.id.cyan(),
                colorize_severity(policy.severity),
                policy.name
            );
            println!("  {:<22} {}", "", policy.description.dimmed());
        }
    }

    println!("\nTotal: {} policies", policies.len());
    Ok(())
}

/// Group policies by category, keeping catalog order.
fn group_policies<'a>(policies: &[&'a Policy]) -> Vec<(&'a str, Vec<&'a Policy>)> {
    let mut groups: Vec<(&str, Vec<&Policy>)> = Vec::new();
    for &policy in policies {
        match groups.iter_mut().find(|(name, _)| *name == policy.category) {
            Some((_, group)) => group.push(policy),
            None => groups.push((policy.category, vec![policy])),
        }
    }
    groups
}

fn colorize_severity(severity: Severity) -> ColoredString {
    let label = format!("{:<10}", severity.as_str().to_uppercase());
    match severity {
        Severity::Critical => label.bright_red().bold(),
        Severity::High => label.red(),
        Severity::Medium => label.yellow(),
        Severity::Low => label.blue(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::policies::all_policies;
    use std::collections::HashSet;

    #[test]
    fn test_group_policies_keeps_catalog_order() {
        let groups = group_policies(all_policies());
        let names: Vec<&str> = groups.iter().map(|(name, _)| *name).collect();
        assert_eq!(names.first(), Some(&all_policies()[0].category));
        let total: usize = groups.iter().map(|(_, g)| g.len()).sum();
        assert_eq!(total, all_policies().len());
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_unknown_severity_errors() {
        assert!(handle_policies(None, Some("bogus".to_string()), true).is_err());
    }
}
