//! Implementation of the `relocator list` command.

use relocator_adapters::InMemoryInventory;
use relocator_core::application::ports::{DiskStore, StorageDomainStore, VmStore};

use crate::{
    cli::{GlobalArgs, ListArgs, ListFormat, Resource},
    commands::load_inventory,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Tabular view of one resource kind. The first column is the display name.
struct Listing {
    title: &'static str,
    headers: &'static [&'static str],
    rows: Vec<Vec<String>>,
}

pub fn execute(
    args: ListArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let inventory = load_inventory(&global, &config)?;

    // JSON goes straight from the records so nothing is lost to formatting.
    if let ListFormat::Json = args.format {
        match args.resource {
            Resource::Domains => output.json(&inventory.list()?)?,
            Resource::Disks => output.json(&inventory.list_disks()?)?,
            Resource::Vms => output.json(&inventory.list_vms()?)?,
        }
        return Ok(());
    }

    let listing = listing(args.resource, &inventory)?;

    match args.format {
        ListFormat::Table => {
            output.header(listing.title)?;
            for line in render_table(&listing) {
                output.print(&line)?;
            }
        }
        ListFormat::List => {
            for row in &listing.rows {
                output.data(&row[0])?;
            }
        }
        ListFormat::Csv => {
            output.data(&listing.headers.join(",").to_lowercase())?;
            for row in &listing.rows {
                let fields: Vec<String> = row.iter().map(|f| csv_field(f)).collect();
                output.data(&fields.join(","))?;
            }
        }
        ListFormat::Json => {}
    }

    Ok(())
}

fn listing(resource: Resource, inventory: &InMemoryInventory) -> CliResult<Listing> {
    let listing = match resource {
        Resource::Domains => Listing {
            title: "Storage Domains:",
            headers: &["NAME", "TYPE", "STATUS", "FREE_GB", "ID"],
            rows: inventory
                .list()?
                .into_iter()
                .map(|d| {
                    vec![
                        d.name,
                        d.storage_type.to_string(),
                        d.status.to_string(),
                        d.available_disk_size_gb
                            .map(|gb| gb.to_string())
                            .unwrap_or_else(|| "-".into()),
                        d.id.to_string(),
                    ]
                })
                .collect(),
        },
        Resource::Disks => {
            let mut rows = Vec::new();
            for disk in inventory.list_disks()? {
                let image = inventory.get_disk_image(disk.id)?;
                rows.push(vec![
                    disk.alias,
                    disk.storage_type.to_string(),
                    image
                        .as_ref()
                        .map(|i| i.image_status.to_string())
                        .unwrap_or_else(|| "-".into()),
                    image
                        .as_ref()
                        .map(|i| format!("{:.1}", i.size as f64 / (1u64 << 30) as f64))
                        .unwrap_or_else(|| "-".into()),
                    disk.id.to_string(),
                ]);
            }
            Listing {
                title: "Disks:",
                headers: &["ALIAS", "KIND", "STATUS", "SIZE_GB", "ID"],
                rows,
            }
        }
        Resource::Vms => Listing {
            title: "Virtual Machines:",
            headers: &["NAME", "STATUS", "ID"],
            rows: inventory
                .list_vms()?
                .into_iter()
                .map(|vm| vec![vm.name, vm.status.to_string(), vm.id.to_string()])
                .collect(),
        },
    };
    Ok(listing)
}

fn render_table(listing: &Listing) -> Vec<String> {
    let mut widths: Vec<usize> = listing.headers.iter().map(|h| h.len()).collect();
    for row in &listing.rows {
        for (width, field) in widths.iter_mut().zip(row) {
            *width = (*width).max(field.chars().count());
        }
    }

    let mut lines = vec![pad_line(listing.headers, &widths)];
    for row in &listing.rows {
        let fields: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(pad_line(&fields, &widths));
    }
    lines
}

fn pad_line(fields: &[&str], widths: &[usize]) -> String {
    let padded: Vec<String> = fields
        .iter()
        .zip(widths)
        .map(|(f, &w)| format!("{f:<w$}"))
        .collect();
    format!("  {}", padded.join("  ").trim_end())
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_quotes_only_when_needed() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn table_columns_are_aligned() {
        let listing = Listing {
            title: "t",
            headers: &["NAME", "ID"],
            rows: vec![vec!["a-much-longer-name".into(), "1".into()]],
        };
        let lines = render_table(&listing);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].find("ID"), lines[1].find('1'));
    }

    #[test]
    fn empty_inventory_lists_nothing() {
        let inventory = InMemoryInventory::new();
        for resource in [Resource::Domains, Resource::Disks, Resource::Vms] {
            assert!(listing(resource, &inventory).unwrap().rows.is_empty());
        }
    }
}
