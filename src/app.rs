use crate::clients::LlmClient;
use crate::config::Config;
use crate::error::AppError;
use crate::models::QuestionSet;
use crate::pdf::EMPTY_PLACEHOLDER;
use crate::services::QuestionGenerator;
use crate::utils::logging::log_startup;
use crate::workflow::{process_document, DocumentReport};
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use figlet_rs::FIGfont;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    generator: QuestionGenerator<LlmClient>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Self {
        log_startup(&config);

        if config.llm_api_key.is_empty() {
            warn!("⚠️ 未设置 LLM_API_KEY / GOOGLE_API_KEY，模型调用将会失败");
        }

        let generator = QuestionGenerator::new(LlmClient::new(&config));
        Self { config, generator }
    }

    /// 运行应用主逻辑：列出 PDF → 选择 → 生成题目 → 输出
    pub async fn run(&self) -> Result<()> {
        print_banner();
        println!("{}", "Select the PDF file listed below:".red());

        let source_dir = Path::new(&self.config.source_dir);
        let pdf_files = list_pdf_files(source_dir).await?;

        if pdf_files.is_empty() {
            println!("{}", "No PDF files found in this folder.".yellow());
            return Ok(());
        }

        for (i, pdf) in pdf_files.iter().enumerate() {
            let name = pdf.file_name().unwrap_or_default().to_string_lossy();
            println!("{}", format!("[{}] {}", i, name).cyan());
        }

        println!(
            "\n{}",
            "Enter the number of the file for which you want to create questions:".red()
        );
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin()
            .lock()
            .read_line(&mut input)
            .context("无法读取输入")?;

        let index = parse_selection(&input)?;
        let selected = pdf_files
            .get(index)
            .with_context(|| format!("索引 {} 超出范围，共有 {} 个文件", index, pdf_files.len()))?;

        info!("已选择: {}", selected.display());

        let output_dir = Path::new(&self.config.output_dir);
        match process_document(&self.generator, selected, output_dir).await {
            Ok(report) => {
                print_report(&report);
                Ok(())
            }
            Err(AppError::DocumentOpen { path, reason }) => {
                error!("❌ 无法打开 PDF {}: {}", path, reason);
                println!("{}", format!("Failed to open PDF: {}", reason).red());
                Ok(())
            }
            Err(e) => Err(e).context("文档处理失败"),
        }
    }
}

/// 列出目录中的 PDF 文件（扩展名不区分大小写，保持目录读取顺序）
pub async fn list_pdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pdf_files = Vec::new();
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("无法读取文件夹: {}", dir.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_pdf = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && entry.file_type().await?.is_file() {
            pdf_files.push(path);
        }
    }

    Ok(pdf_files)
}

/// 解析用户输入的文件编号
pub fn parse_selection(input: &str) -> Result<usize> {
    let trimmed = input.trim();
    trimmed
        .parse::<usize>()
        .with_context(|| format!("无效的文件编号: '{}'", trimmed))
}

const BANNER_TEXT: &str = "WELCOME-TO-QGEN";

/// FIGlet 字样的欢迎横幅；字体加载失败时退回纯文本
fn banner_text() -> String {
    FIGfont::standard()
        .ok()
        .and_then(|font| font.convert(BANNER_TEXT).map(|figure| figure.to_string()))
        .unwrap_or_else(|| BANNER_TEXT.to_string())
}

fn print_banner() {
    println!("{}", banner_text().green());
}

fn print_report(report: &DocumentReport) {
    let name = report.source.file_name().unwrap_or_default().to_string_lossy();
    println!("{}", format!("\nGenerated questions from {}:\n", name).green());

    if let Some(failure) = &report.failure {
        println!("{}", format!("Error: {}", failure.error).red());
    }

    print_questions(&report.questions);

    println!(
        "{}",
        format!("\nQuestions saved to {}", report.output.display()).green()
    );
}

fn print_questions(questions: &QuestionSet) {
    for (category, items) in questions.iter() {
        println!("{}", category.heading().yellow());
        if items.is_empty() {
            println!("{}\n", EMPTY_PLACEHOLDER);
        } else {
            for (i, question) in items.iter().enumerate() {
                println!("{}. {}", i + 1, question);
            }
        }
        println!();
    }
}
