use std::sync::Arc;
use std::time::Instant;

use movie_stream_client::api::{ApiClient, AuthService, CatalogApi, MovieService};
use movie_stream_client::controller::{CatalogBrowser, CatalogQuery, DisplayState};
use movie_stream_client::models::Genre;
use movie_stream_client::services::{Access, AccessPolicy, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let base_url =
        std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let session_file =
        std::env::var("SESSION_FILE").unwrap_or_else(|_| "./session.json".to_string());
    let upgrade_url =
        std::env::var("UPGRADE_URL").unwrap_or_else(|_| "/subscription/upgrade".to_string());

    tracing::info!("Using API at {}", base_url);

    let session = SessionStore::file(&session_file);
    let client = ApiClient::new(&base_url, session.clone());
    let policy = AccessPolicy::new(&upgrade_url);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(|s| s.as_str()) {
        Some("login") if args.len() >= 3 => {
            let auth = AuthService::new(client);
            let signed_in = auth.sign_in(&args[1], &args[2]).await?;
            println!("Signed in as {} ({:?})", args[1], signed_in.role);
        }
        Some("logout") => {
            session.clear();
            println!("Signed out");
        }
        Some("list") => {
            let genre = args
                .get(1)
                .and_then(|g| g.parse::<Genre>().ok())
                .unwrap_or(Genre::All);
            let page = args.get(2).and_then(|p| p.parse::<u32>().ok()).unwrap_or(1);
            let query = CatalogQuery {
                genre,
                search: String::new(),
                page,
            };
            let api = Arc::new(MovieService::new(client));
            let mut browser =
                CatalogBrowser::mount(api, session, policy, &query.to_query_string());
            browser.load().await;
            print_view(&mut browser);
        }
        Some("search") if args.len() >= 2 => {
            let api = Arc::new(MovieService::new(client));
            let mut browser = CatalogBrowser::mount(api, session, policy, "");
            // 一次性命令直接走提交路径，不等防抖窗口
            browser.input_search(&args[1], Instant::now());
            browser.submit_search().await;
            print_view(&mut browser);
        }
        Some("get") if args.len() >= 2 => {
            let id: i64 = args[1].parse()?;
            let service = MovieService::new(client);
            let movie = service.get_movie(id).await?;
            match policy.check(&session.current(), &movie) {
                Access::Granted => {
                    println!("{} ({})", movie.title, movie.year.unwrap_or_default());
                    if !movie.genre.is_empty() {
                        println!("  Genres:   {}", movie.genres().join(", "));
                    }
                    if let Some(rating) = movie.rating {
                        println!("  Rating:   {:.1}/10", rating);
                    }
                    if movie.duration.is_some() {
                        println!("  Duration: {}", movie.duration_text());
                    }
                    if let Some(ref director) = movie.director {
                        println!("  Director: {}", director);
                    }
                    if let Some(ref description) = movie.description {
                        println!("  {}", description);
                    }
                }
                Access::UpgradeRequired { upgrade_url } => {
                    println!(
                        "'{}' is premium content. Upgrade your plan at {}",
                        movie.title, upgrade_url
                    );
                }
            }
        }
        _ => {
            eprintln!("Usage:");
            eprintln!("  login <email> <password>");
            eprintln!("  logout");
            eprintln!("  list [genre] [page]");
            eprintln!("  search <text>");
            eprintln!("  get <id>");
        }
    }

    Ok(())
}

fn print_view(browser: &mut CatalogBrowser) {
    match browser.display() {
        DisplayState::Cards => {
            if let Some(page) = browser.page() {
                for movie in &page.movies {
                    let premium = if movie.premium { " [premium]" } else { "" };
                    println!("{:>6}  {}{}", movie.id, movie.title, premium);
                }
                println!(
                    "Page {} of {} ({} titles)",
                    page.pagination.current_page,
                    page.pagination.total_pages,
                    page.pagination.total_count
                );
            }
        }
        DisplayState::NoResults => println!("No movies found"),
        DisplayState::Error => {
            if let Some(message) = browser.error_message() {
                eprintln!("Error: {}", message);
            }
        }
        DisplayState::Idle | DisplayState::Loading => {}
    }
    if let Some(toast) = browser.take_toast() {
        eprintln!("{}", toast);
    }
}
