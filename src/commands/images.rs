//! Image commands: `images upload`, `images list`, `images rm`.

use crate::image;
use crate::sync::PendingUpload;
use crate::utils::format_file_size;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// Process local files through the pipeline and upload the results.
pub fn upload(files: &[PathBuf]) -> Result<()> {
    if files.is_empty() {
        anyhow::bail!("No files given. Usage: lifelog images upload <files...>");
    }

    let app = super::open()?;

    if !app.sync.validate_image_upload_permission() {
        println!("Warning: could not confirm push permission; uploads may be rejected.");
    }

    println!("Processing {} files...", files.len());
    let batch = image::process_images(files);

    for failed in &batch.failed {
        println!("  skipped {}: {}", failed.original.display(), failed.error);
    }
    if batch.successful.is_empty() {
        anyhow::bail!("Nothing to upload.");
    }

    for processed in &batch.successful {
        println!(
            "  {} -> {} ({} -> {}, {})",
            processed.original.display(),
            processed.file_name,
            format_file_size(processed.original_size),
            format_file_size(processed.compressed_size),
            processed.compression_ratio()
        );
    }

    let pending: Vec<PendingUpload> = batch.successful.iter().map(PendingUpload::from).collect();

    let bar = ProgressBar::new(pending.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut uploaded = 0usize;
    let mut failed = 0usize;
    for item in &pending {
        bar.set_message(item.file_name.clone());
        match app.sync.upload_image(&item.file_name, &item.content_base64) {
            Ok(result) => {
                uploaded += 1;
                bar.println(format!("  uploaded {} -> {}", result.file_name, result.url));
            }
            Err(err) => {
                failed += 1;
                bar.println(format!("  failed {}: {err}", item.file_name));
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    for processed in &batch.successful {
        image::release_preview(&processed.preview);
    }

    println!("\n{uploaded} uploaded, {failed} failed, {} skipped", batch.failed.len());
    if failed > 0 {
        anyhow::bail!("Some uploads failed.");
    }
    Ok(())
}

/// List images in the remote images directory.
pub fn list() -> Result<()> {
    let app = super::open()?;
    let images = app.sync.list_images()?;

    if images.is_empty() {
        println!("No remote images.");
        return Ok(());
    }

    println!("{:<45} {:>10}  URL", "NAME", "SIZE");
    for image in &images {
        println!(
            "{:<45} {:>10}  {}",
            image.name,
            format_file_size(image.size),
            image.url
        );
    }
    println!("\n{} images", images.len());
    Ok(())
}

/// Delete a remote image after confirmation.
pub fn remove(name: &str, yes: bool) -> Result<()> {
    if !yes && !super::confirm(&format!("Delete remote image '{name}'?"))? {
        println!("Aborted.");
        return Ok(());
    }

    let app = super::open()?;
    app.sync.delete_image(name)?;
    println!("Deleted {name}");
    Ok(())
}
