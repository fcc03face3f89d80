use drawstat_analysis::schema::LotterySchema;

use crate::config::Settings;

pub(crate) fn run(settings: &Settings) {
    println!(
        "{:<12} {:<24} {:<10} {:<10} {:<12}",
        "Id", "Name", "Primary", "Secondary", "Date format"
    );
    println!("{}", "-".repeat(72));
    for schema in settings.registry.iter() {
        println!(
            "{:<12} {:<24} {:<10} {:<10} {:<12}",
            schema.id(),
            schema.name(),
            format!("{}x {}", schema.primary_count(), schema.primary_range()),
            secondary_label(schema),
            schema.date_format(),
        );
    }
    println!();
    for schema in settings.registry.iter() {
        println!("{}: {}", schema.id(), schema.columns().join(","));
    }
}

fn secondary_label(schema: &LotterySchema) -> String {
    match schema.secondary_range() {
        Some(range) if schema.secondary_count() > 0 => {
            format!("{}x {range}", schema.secondary_count())
        }
        _ => "-".to_owned(),
    }
}
