//! Category and subcategory command implementations

use anyhow::Result;

use centavo_core::models::{Category, Subcategory};
use centavo_core::store::{Store, StoreClient};

use super::fetch_taxonomy;

pub async fn cmd_categories_list(store: &StoreClient) -> Result<()> {
    let taxonomy = fetch_taxonomy(store).await?;

    if taxonomy.is_empty() {
        println!("No categories yet. Add one with 'centavo categories add'.");
        return Ok(());
    }

    println!();
    println!("🗂️  Categories");
    println!("   ─────────────────────────────────────────────────────────────");
    for category in taxonomy.categories() {
        println!("   • {}", category.name);
        for name in taxonomy.subcategory_names(&category.name) {
            println!("       {}", name);
        }
    }

    Ok(())
}

pub async fn cmd_categories_add(store: &StoreClient, name: &str) -> Result<()> {
    let taxonomy = fetch_taxonomy(store).await?;
    if taxonomy.resolve_category(name).is_some() {
        anyhow::bail!("Category already exists: {}", name);
    }

    let stored = store
        .create_category(&Category {
            id: None,
            name: name.to_string(),
        })
        .await?;
    println!(
        "✅ Created category '{}' (id: {})",
        name,
        stored.id.as_deref().unwrap_or("-")
    );

    Ok(())
}

pub async fn cmd_categories_rename(store: &StoreClient, name: &str, new_name: &str) -> Result<()> {
    let taxonomy = fetch_taxonomy(store).await?;
    let mut category = taxonomy
        .resolve_category(name)
        .ok_or_else(|| anyhow::anyhow!("Category not found: {}", name))?
        .clone();

    category.name = new_name.to_string();
    store.update_category(&category).await?;
    println!("✅ Renamed '{}' to '{}'", name, new_name);

    Ok(())
}

pub async fn cmd_categories_delete(store: &StoreClient, name: &str) -> Result<()> {
    let taxonomy = fetch_taxonomy(store).await?;
    let category = taxonomy
        .resolve_category(name)
        .ok_or_else(|| anyhow::anyhow!("Category not found: {}", name))?;
    let id = category
        .id
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("Category '{}' has no id", name))?;

    let children = taxonomy.subcategory_names(name);
    if !children.is_empty() {
        anyhow::bail!(
            "Category '{}' has {} subcategories. Delete them first.",
            name,
            children.len()
        );
    }

    store.delete_category(id).await?;
    println!("✅ Deleted category '{}'", name);

    Ok(())
}

pub async fn cmd_subcategories_list(store: &StoreClient, category: Option<&str>) -> Result<()> {
    let taxonomy = fetch_taxonomy(store).await?;

    let names: Vec<String> = match category {
        Some(category_name) => {
            if taxonomy.resolve_category(category_name).is_none() {
                anyhow::bail!("Category not found: {}", category_name);
            }
            taxonomy.subcategory_names(category_name)
        }
        None => taxonomy
            .subcategories()
            .iter()
            .map(|s| s.name.clone())
            .collect(),
    };

    if names.is_empty() {
        println!("No subcategories found.");
        return Ok(());
    }

    for name in names {
        println!("   • {}", name);
    }

    Ok(())
}

pub async fn cmd_subcategories_add(store: &StoreClient, category: &str, name: &str) -> Result<()> {
    let taxonomy = fetch_taxonomy(store).await?;
    let category_row = taxonomy
        .resolve_category(category)
        .ok_or_else(|| anyhow::anyhow!("Category not found: {}", category))?;
    let category_id = category_row
        .id
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Category '{}' has no id", category))?;

    if taxonomy.resolve_subcategory_id(category, name).is_some() {
        anyhow::bail!("Subcategory '{}' already exists under '{}'", name, category);
    }

    let stored = store
        .create_subcategory(&Subcategory {
            id: None,
            category_id,
            name: name.to_string(),
        })
        .await?;
    println!(
        "✅ Created subcategory '{}' under '{}' (id: {})",
        name,
        category,
        stored.id.as_deref().unwrap_or("-")
    );

    Ok(())
}

pub async fn cmd_subcategories_rename(
    store: &StoreClient,
    category: &str,
    name: &str,
    new_name: &str,
) -> Result<()> {
    let taxonomy = fetch_taxonomy(store).await?;
    let id = taxonomy
        .resolve_subcategory_id(category, name)
        .ok_or_else(|| anyhow::anyhow!("No subcategory '{}' under '{}'", name, category))?
        .to_string();
    let mut subcategory = taxonomy
        .subcategory_by_id(&id)
        .ok_or_else(|| anyhow::anyhow!("No subcategory '{}' under '{}'", name, category))?
        .clone();

    subcategory.name = new_name.to_string();
    store.update_subcategory(&subcategory).await?;
    println!("✅ Renamed '{}' to '{}'", name, new_name);

    Ok(())
}

pub async fn cmd_subcategories_delete(
    store: &StoreClient,
    category: &str,
    name: &str,
) -> Result<()> {
    let taxonomy = fetch_taxonomy(store).await?;
    let id = taxonomy
        .resolve_subcategory_id(category, name)
        .ok_or_else(|| anyhow::anyhow!("No subcategory '{}' under '{}'", name, category))?
        .to_string();

    store.delete_subcategory(&id).await?;
    println!("✅ Deleted subcategory '{}'", name);

    Ok(())
}
