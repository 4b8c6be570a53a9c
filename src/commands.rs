//! One-shot CLI operations mirroring the interactive flows.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::{ApiClient, DocumentQuery};

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}").expect("Failed to build spinner style"),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Fetch the collection once and print one entry per document.
pub async fn list(api: &ApiClient, query: DocumentQuery) -> Result<()> {
    let bar = spinner("正在获取素材列表...");
    let documents = api.list_documents(&query).await;
    bar.finish_and_clear();
    let documents = documents?;

    if documents.is_empty() {
        println!("{}", style("暂无相关素材").dim());
        return Ok(());
    }

    for doc in &documents {
        let mut labels = String::new();
        for theme in &doc.themes {
            labels.push_str(&format!("#{} ", theme));
        }
        println!(
            "{:>5}  {}  {}  {}",
            style(doc.id).bold(),
            style(format!("[{}]", doc.display_type())).yellow(),
            style(&doc.date).dim(),
            style(labels.trim_end()).cyan(),
        );
        println!("       {}", doc.preview(60));
    }
    println!();
    println!("共 {} 条素材", style(documents.len()).bold());
    Ok(())
}

/// Upload a file when `input` names one, otherwise import it as
/// text or a link. Exits non-zero when the pipeline rejects it.
pub async fn upload(api: &ApiClient, input: &str) -> Result<()> {
    let expanded = shellexpand::tilde(input);
    let path = Path::new(expanded.as_ref());

    let bar = spinner("AI 正在深度解析...");
    let outcome = if path.is_file() {
        api.upload_file(path).await
    } else {
        api.upload_text(input).await
    };
    bar.finish_and_clear();
    let outcome = outcome?;

    if !outcome.is_success() {
        bail!(
            "处理失败: {}",
            outcome.message.unwrap_or_else(|| "解析失败或内容为空".to_string())
        );
    }

    match outcome.count {
        Some(count) => println!("{} 导入成功，新增 {} 条素材", style("✓").green(), count),
        None => println!("{} 导入成功", style("✓").green()),
    }
    Ok(())
}
