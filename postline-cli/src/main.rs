use std::process;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use postline_client::{
    CmsClient, CmsError, PostDetail, PostFeed, PostSummary, estimate_minutes,
    format_publication_date, format_reading_time, plain_text,
};
use tracing_subscriber::EnvFilter;

const API_URL_ENV: &str = "CMS_API_URL";
const ACCESS_TOKEN_ENV: &str = "CMS_ACCESS_TOKEN";

#[derive(Debug, Parser)]
#[command(
    name = "postline-cli",
    version,
    about = "Терминальный просмотр блога из headless CMS"
)]
struct Cli {
    /// Базовый URL API контента (по умолчанию переменная CMS_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Access token репозитория (по умолчанию переменная CMS_ACCESS_TOKEN).
    #[arg(long, global = true)]
    access_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Список постов с постраничной докачкой.
    List {
        /// Размер страницы выдачи.
        #[arg(long, default_value_t = 20)]
        page_size: u32,
        /// Сколько дополнительных страниц догрузить после первой.
        #[arg(long, default_value_t = 0)]
        pages: u32,
        /// Вывести накопленный список в JSON вместо текста.
        #[arg(long)]
        json: bool,
    },
    /// Просмотр поста по uid.
    Show {
        /// Уникальный идентификатор поста.
        uid: String,
        /// Вывести пост в JSON вместо текста.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging()?;

    let cli = Cli::parse();
    let api_url = resolve_api_url(cli.api_url, std::env::var(API_URL_ENV).ok())?;
    let access_token = resolve_access_token(cli.access_token, std::env::var(ACCESS_TOKEN_ENV).ok());

    let mut client = CmsClient::new(api_url);
    if let Some(token) = access_token {
        client = client.with_access_token(token);
    }

    match cli.command {
        Command::List {
            page_size,
            pages,
            json,
        } => list_posts(&client, page_size, pages, json).await,
        Command::Show { uid, json } => show_post(&client, &uid, json).await,
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}

/// Поток списка: первая страница печатается сразу, затем до `pages`
/// последовательных докачек. Неудачная докачка не трогает уже показанное.
async fn list_posts(client: &CmsClient, page_size: u32, pages: u32, json: bool) -> Result<()> {
    let first = client
        .query_posts(page_size)
        .await
        .map_err(map_client_error)?;
    let mut feed = PostFeed::new(first);

    if !json {
        print_summaries(feed.posts(), 0);
    }

    for _ in 0..pages {
        if !feed.can_load_more() {
            break;
        }
        let shown = feed.posts().len();
        match feed.load_more(client).await {
            Ok(_) => {
                if !json {
                    print_summaries(&feed.posts()[shown..], shown);
                }
            }
            Err(err) => {
                eprintln!(
                    "Не удалось загрузить следующую страницу: {}",
                    user_message(&err)
                );
                break;
            }
        }
    }

    if json {
        let rendered =
            serde_json::to_string_pretty(&feed).context("сериализация списка в JSON")?;
        println!("{rendered}");
        return Ok(());
    }

    println!();
    println!("Показано постов: {}", feed.posts().len());
    if feed.can_load_more() {
        println!("Есть ещё посты: повторите с --pages {}", pages + 1);
    }

    Ok(())
}

async fn show_post(client: &CmsClient, uid: &str, json: bool) -> Result<()> {
    let post = match client.get_by_uid(uid).await {
        Ok(post) => post,
        Err(CmsError::NotFound) => return Err(anyhow!("пост не найден: uid={uid}")),
        Err(err) => return Err(map_client_error(err)),
    };

    if json {
        let rendered = serde_json::to_string_pretty(&post).context("сериализация поста в JSON")?;
        println!("{rendered}");
        return Ok(());
    }

    print_detail(&post);
    Ok(())
}

fn resolve_api_url(flag: Option<String>, env: Option<String>) -> Result<String> {
    let raw = flag.or(env).unwrap_or_default();
    let trimmed = raw.trim().trim_end_matches('/').to_string();
    if trimmed.is_empty() {
        return Err(anyhow!(
            "не задан адрес API: передайте --api-url или переменную {API_URL_ENV}"
        ));
    }
    Ok(normalize_api_url(trimmed))
}

fn normalize_api_url(url: String) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url;
    }

    format!("https://{url}")
}

fn resolve_access_token(flag: Option<String>, env: Option<String>) -> Option<String> {
    flag.or(env)
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn user_message(err: &CmsError) -> String {
    match err {
        CmsError::Unauthorized => "доступ запрещён: проверьте access token".to_string(),
        CmsError::NotFound => "документ не найден".to_string(),
        CmsError::Malformed(message) => format!("неожиданный формат ответа: {message}"),
        CmsError::Status { status, message } => {
            format!("источник вернул статус {status}: {message}")
        }
        CmsError::Http(err) => format!("ошибка HTTP: {err}"),
    }
}

fn map_client_error(err: CmsError) -> anyhow::Error {
    anyhow!(user_message(&err))
}

fn print_summaries(posts: &[PostSummary], shown: usize) {
    for (index, post) in posts.iter().enumerate() {
        println!("{}. {}", shown + index + 1, post.title);
        if !post.subtitle.is_empty() {
            println!("   {}", post.subtitle);
        }
        println!(
            "   {} | {} | uid={}",
            format_publication_date(post.first_publication_date.as_ref()),
            post.author,
            post.uid
        );
    }
}

fn print_detail(post: &PostDetail) {
    if !post.banner_url.is_empty() {
        println!("[{}]", post.banner_url);
    }
    println!("{}", post.title);
    println!(
        "{} | {} | {}",
        format_publication_date(post.first_publication_date.as_ref()),
        post.author,
        format_reading_time(estimate_minutes(&post.content))
    );

    for section in &post.content {
        println!();
        if !section.heading.is_empty() {
            println!("## {}", section.heading);
        }
        let text = plain_text(&section.body);
        if !text.is_empty() {
            println!("{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_api_url_keeps_scheme() {
        let url = normalize_api_url("http://localhost:4000/api".to_string());
        assert_eq!(url, "http://localhost:4000/api");
    }

    #[test]
    fn normalize_api_url_adds_https_scheme() {
        let url = normalize_api_url("repo.example.com/api/v2".to_string());
        assert_eq!(url, "https://repo.example.com/api/v2");
    }

    #[test]
    fn resolve_api_url_prefers_flag_over_env() {
        let url = resolve_api_url(
            Some("https://flag.example.com".to_string()),
            Some("https://env.example.com".to_string()),
        )
        .expect("url must resolve");
        assert_eq!(url, "https://flag.example.com");
    }

    #[test]
    fn resolve_api_url_falls_back_to_env() {
        let url = resolve_api_url(None, Some("https://env.example.com".to_string()))
            .expect("url must resolve");
        assert_eq!(url, "https://env.example.com");
    }

    #[test]
    fn resolve_api_url_strips_trailing_slash() {
        let url = resolve_api_url(Some("https://repo.example.com/api/v2/".to_string()), None)
            .expect("url must resolve");
        assert_eq!(url, "https://repo.example.com/api/v2");
    }

    #[test]
    fn resolve_api_url_rejects_missing_value() {
        let result = resolve_api_url(None, None);
        assert!(result.is_err());
    }

    #[test]
    fn resolve_access_token_trims_whitespace() {
        let token = resolve_access_token(Some("  secret  ".to_string()), None);
        assert_eq!(token.as_deref(), Some("secret"));
    }

    #[test]
    fn resolve_access_token_rejects_blank() {
        let token = resolve_access_token(Some("   ".to_string()), None);
        assert!(token.is_none());
    }

    #[test]
    fn resolve_access_token_falls_back_to_env() {
        let token = resolve_access_token(None, Some("from-env".to_string()));
        assert_eq!(token.as_deref(), Some("from-env"));
    }
}
