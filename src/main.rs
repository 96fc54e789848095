use waypost::{config, handlers, services};

use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use std::net::SocketAddr;
use std::process;
use std::sync::{Arc, Mutex};
use terminal_size::{terminal_size, Width};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use config::{DEFAULT_HOST, DEFAULT_PORT};
use waypost::geo::{GeoCache, VenueStore};
use waypost::models::{AppState, UserRecord, VenueRow};
use waypost::services::{
    generate_password_hash, parse_venue_payload_file, persist_users_file, SearchFilter,
};

// Embed the default stylesheet in the binary
const DEFAULT_STYLESHEET: &str = include_str!("../static/styles.css");

async fn build_state_from_env(env_file: Option<&str>) -> AppState {
    config::load_env_file(env_file);
    let users = services::load_users_from_file();
    let geo = GeoCache::new(
        config::get_cities_file(),
        config::get_admin1_file(),
        config::get_slugs_file(),
    );
    let venues = VenueStore::new(config::get_venues_file());
    let hidden_venues = Arc::new(Mutex::new(config::get_hidden_venue_ids()));

    let client = reqwest::Client::builder()
        .user_agent(format!("Waypost/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to create HTTP client");

    AppState {
        users,
        sessions: Arc::new(Mutex::new(std::collections::HashMap::new())),
        flash_store: Arc::new(Mutex::new(std::collections::HashMap::new())),
        geo,
        venues,
        public_base_url: config::get_public_base_url(),
        sync_api_base_url: config::get_sync_api_base_url(),
        sync_api_token: config::get_sync_api_token(),
        announcer_webhook_url: config::get_announcer_webhook_url(),
        client,
        hidden_venues,
        custom_css: None,
    }
}

fn build_app(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/users", get(handlers::users::users_list).post(handlers::users::users_create))
        .route("/users/reset-password", post(handlers::users::reset_password))
        .route("/users/:username/role", post(handlers::users::update_role))
        .route("/users/:username/delete", post(handlers::users::delete_user))
        .route("/admin", get(handlers::admin::admin_get))
        .route("/admin/reload", post(handlers::admin::admin_reload_post))
        .route("/admin/enrich", post(handlers::admin::admin_enrich_post))
        .route("/admin/hidden", post(handlers::admin::admin_hidden_post))
        .route(
            "/venues/new",
            get(handlers::venues::venue_new_get).post(handlers::venues::venue_new_post),
        )
        .route(
            "/venue/:id/edit",
            get(handlers::venues::venue_edit_get).post(handlers::venues::venue_edit_post),
        )
        .route("/venue/:id/delete", post(handlers::venues::venue_delete_post))
        .route("/about", get(handlers::system::about_get))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            handlers::middleware::auth_middleware,
        ));

    // Always serve styles.css - use custom if provided, otherwise use embedded default
    let stylesheet_content = state
        .custom_css
        .clone()
        .unwrap_or_else(|| DEFAULT_STYLESHEET.to_string());

    let app = Router::new()
        .route("/", get(handlers::auth::root_get))
        .route("/login", get(handlers::auth::login_get).post(handlers::auth::login_post))
        .route("/logout", post(handlers::auth::logout_post))
        .route("/venues", get(handlers::venues::venues_list))
        .route("/venue/:id", get(handlers::venues::venue_detail))
        .route("/d/:slug", get(handlers::seo::region_page))
        .route("/sitemap.xml", get(handlers::seo::sitemap_xml))
        .route("/robots.txt", get(handlers::seo::robots_txt))
        .route("/healthz", get(handlers::system::health_get))
        .route("/api/nearest", get(handlers::geo::api_nearest))
        .route(
            "/api/venues",
            get(handlers::venues::api_venues_list).post(handlers::venues::api_venue_create),
        )
        .route(
            "/api/venues/:id",
            get(handlers::venues::api_venue_get)
                .put(handlers::venues::api_venue_update)
                .delete(handlers::venues::api_venue_delete),
        )
        .route(
            "/static/styles.css",
            get(move || {
                let css = stylesheet_content.clone();
                async move { ([(axum::http::header::CONTENT_TYPE, "text/css")], css) }
            }),
        )
        .merge(protected_routes);

    app.nest_service(
        "/static",
        ServiceBuilder::new()
            .layer(SetResponseHeaderLayer::if_not_present(
                CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=31536000, immutable"),
            ))
            .service(ServeDir::new("static")),
    )
    .with_state(state)
}

async fn start_server(mut state: AppState, host: &str, port: u16, stylesheet: Option<String>) {
    if let Some(path) = stylesheet {
        match std::fs::read_to_string(&path) {
            Ok(css) => {
                state.custom_css = Some(css);
                tracing::info!("Loaded custom stylesheet from {}", path);
            }
            Err(e) => {
                tracing::error!(%e, "Failed to read custom stylesheet");
                eprintln!("{} {}: {}", yansi::Paint::red("Failed to read custom stylesheet at"), path, e);
                process::exit(1);
            }
        }
    }

    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%e, "Invalid host/port format");
            eprintln!("{}: {}", yansi::Paint::red("Invalid host/port format"), e);
            process::exit(1);
        }
    };
    let app = build_app(state.clone());
    tracing::info!(%addr, "Starting Waypost server");
    println!(
        "{} {}",
        yansi::Paint::new("Web server running on").green(),
        yansi::Paint::new(format!("http://{}", addr)).cyan()
    );
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(%e, "Server encountered an error while running");
                eprintln!("{}: {}", yansi::Paint::new("Server error").red(), e);
                process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(%e, "Failed to bind to address; is the port already in use?");
            eprintln!(
                "{}: {}\n{}",
                yansi::Paint::new(format!("Failed to bind to {}", addr)).red(),
                e,
                yansi::Paint::new("Please stop any process using this port, or start the server with a different --port value.").yellow()
            );
            process::exit(1);
        }
    }
}

fn new_cli_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w - 4);
    }
    table
}

fn print_table(value: &serde_json::Value) {
    let mut table = new_cli_table();
    match value {
        serde_json::Value::Array(arr) => {
            if arr.is_empty() {
                println!("(empty list)");
                return;
            }
            if let Some(first) = arr.iter().find_map(|v| v.as_object()) {
                let headers: Vec<&String> = first.keys().collect();
                table.set_header(&headers);
                for item in arr {
                    if let Some(obj) = item.as_object() {
                        let row: Vec<String> = headers
                            .iter()
                            .map(|k| obj.get(*k).map(waypost::utils::value_to_short_string).unwrap_or_default())
                            .collect();
                        table.add_row(row);
                    }
                }
            } else {
                table.set_header(vec!["Value"]);
                for item in arr {
                    table.add_row(vec![waypost::utils::value_to_short_string(item)]);
                }
            }
        }
        serde_json::Value::Object(obj) => {
            table.set_header(vec!["Field", "Value"]);
            for (k, v) in obj {
                table.add_row(vec![k, &waypost::utils::value_to_short_string(v)]);
            }
        }
        _ => {
            println!("{}", waypost::utils::value_to_short_string(value));
            return;
        }
    }

    println!("\n{table}\n");
}

#[derive(Parser)]
#[command(
    name = "waypost",
    author,
    version,
    about = "Waypost command-line tool",
    long_about = r#"Waypost — a self-hosted, map-based local business directory.

This tool surfaces a small set of commands to run the server, validate
configuration, manage local users and work with the venue directory from the
terminal. Use the `--env-file` option or environment variables to point at
your data files and the remote sync API.

Examples:
  1) Build & run (dev):
      cargo run -- serve --host 127.0.0.1 --port 8080
  2) Build a release binary:
      cargo build --release
  3) Work with venues:
      waypost venues list --category cafe
      waypost geo nearest --lat 52.52 --lng 13.405
"#,
    after_help = "Use `waypost <subcommand> --help` to get subcommand specific options and usage examples."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
    /// Disable request/response logging on remote API calls
    #[arg(long, global = true)]
    silent: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Host to bind to
        #[arg(long, default_value_t = String::from(DEFAULT_HOST))]
        host: String,
        /// Port to bind to
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Path to .env file
        #[arg(long)]
        env_file: Option<String>,
        /// Path to a custom stylesheet to serve instead of the default
        #[arg(long)]
        stylesheet: Option<String>,
    },
    /// Validate configuration (data files / sync API credentials)
    #[command(
        about = "Validate configuration and data files.",
        long_about = "Check that the configured data files exist and parse, and optionally validate the sync API by requesting one venue from the remote."
    )]
    CheckConfig { env_file: Option<String> },
    /// Manage local users (users.json)
    Users {
        #[command(subcommand)]
        sub: UserCommands,
    },
    /// Work with the venue directory
    #[command(
        about = "List, inspect, import and delete venues",
        long_about = "These commands operate on the same venue store the web UI serves; mutations are persisted to venues.json immediately."
    )]
    Venues {
        #[command(subcommand)]
        sub: VenueCommands,
    },
    /// Query the geo caches
    Geo {
        #[command(subcommand)]
        sub: GeoCommands,
    },
    /// Fetch venue updates from the configured sync API
    Sync {
        /// Only fetch venues updated since this RFC 3339 timestamp
        #[arg(long)]
        since: Option<String>,
    },
    /// Reverse-geocode venues that are missing address tags
    Enrich,
    /// Generate the sitemap
    Sitemap {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<String>,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    #[command(about = "List current users", long_about = "Enumerate users stored in users.json (username, role).")]
    List,
    #[command(about = "Add a new user", long_about = "Add a user with a role (owner|editor). The password will be hashed and saved to users.json.")]
    Add {
        username: String,
        password: String,
        role: String,
    },
    /// Add a new owner user (use --force to overwrite existing owner user(s))
    #[command(about = "Add an owner user", long_about = "Create a new owner user. Use --force to overwrite an existing owner user or create another owner.")]
    AddOwner {
        username: String,
        password: String,
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    #[command(about = "Reset a user's password", long_about = "Set a new password for an existing user; password will be hashed.")]
    ResetPassword { username: String, password: String },
}

#[derive(Subcommand)]
enum VenueCommands {
    /// List venues (optional filters)
    #[command(about = "List venues", long_about = "List venues from the local store. Use `--category`, `--country` and `--q` to filter, and `--page`/`--per-page` for pagination.")]
    List {
        /// Text query over names and tag values
        #[arg(long)]
        q: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        country: Option<String>,
        /// Page number to display (1-indexed). Use 0 to show all venues without pagination.
        #[arg(long, short = 'p', default_value = "0")]
        page: usize,
        /// Number of venues per page (default: 20, only used when page > 0)
        #[arg(long, default_value = "20")]
        per_page: usize,
    },
    /// Show the raw venue record
    #[command(about = "Show venue details", long_about = "Print the full JSON record for a venue id.")]
    Show { venue_id: String },
    /// Delete a venue
    #[command(about = "Delete a venue", long_about = "Permanently remove a venue from venues.json.")]
    Delete { venue_id: String },
    /// Import venues from a local JSON file
    #[command(about = "Import venues", long_about = "Merge a local JSON export (array of venue objects, or {\"data\": [...]}) into the store by id.")]
    Import { file: String },
}

#[derive(Subcommand)]
enum GeoCommands {
    /// Nearest city to a coordinate pair
    Nearest {
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lng: f64,
    },
    /// Cache sizes and index state
    Stats,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // CLI parsing
    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    if cli.silent {
        waypost::api::set_silent(true);
    }

    // Dispatch CLI commands. If no command provided, serve the web app by default
    if cli.command.is_none() {
        let state = build_state_from_env(None).await;
        start_server(state, DEFAULT_HOST, DEFAULT_PORT, None).await;
        return;
    }
    match cli.command.unwrap() {
        Commands::Serve {
            host,
            port,
            env_file,
            stylesheet,
        } => {
            let state = build_state_from_env(env_file.as_deref()).await;
            start_server(state, &host, port, stylesheet).await;
        }
        Commands::CheckConfig { env_file } => {
            let state = build_state_from_env(env_file.as_deref()).await;
            let mut ok = true;
            for (label, path) in [
                ("cities file", config::get_cities_file()),
                ("admin1 file", config::get_admin1_file()),
                ("slugs file", config::get_slugs_file()),
                ("venues file", config::get_venues_file()),
            ] {
                if path.exists() {
                    println!(
                        "{} {} ({})",
                        yansi::Paint::new("found").green(),
                        label,
                        path.display()
                    );
                } else {
                    eprintln!(
                        "{} {} ({})",
                        yansi::Paint::new("missing").red(),
                        label,
                        path.display()
                    );
                    ok = false;
                }
            }
            println!(
                "cities: {}, admin1: {}, slugs: {}, venues: {}",
                state.geo.cities.len(),
                state.geo.admin1.len(),
                state.geo.slugs.len(),
                state.venues.len()
            );
            if state.sync_api_base_url.is_empty() {
                println!("{}", yansi::Paint::new("SYNC_API_BASE_URL is not configured; sync disabled").yellow());
            } else {
                let resp = waypost::api::api_call(
                    &state.client,
                    &state.sync_api_base_url,
                    &state.sync_api_token,
                    "GET",
                    "/v1/venues",
                    None,
                    Some(vec![("limit".into(), "1".into())]),
                )
                .await;
                if resp.get("error").is_some() {
                    eprintln!("{}", yansi::Paint::new("Sync API is unreachable").red());
                    print_table(&resp);
                    ok = false;
                } else {
                    println!("{}", yansi::Paint::new("Sync API responded").green());
                }
            }
            process::exit(if ok { 0 } else { 1 });
        }
        Commands::Users { sub } => {
            let state = build_state_from_env(None).await;
            match sub {
                UserCommands::List => {
                    let users = state.users.lock().unwrap();
                    println!("{}", yansi::Paint::new("username\trole").bold().underline());
                    for (u, rec) in users.iter() {
                        println!("{}\t{}", u, rec.role);
                    }
                }
                UserCommands::Add {
                    username,
                    password,
                    role,
                } => {
                    let uname = username.trim().to_lowercase();
                    let mut users = state.users.lock().unwrap();
                    if users.contains_key(&uname) {
                        eprintln!("{} '{}' {}", yansi::Paint::new("User").red(), uname, yansi::Paint::new("already exists").red());
                        process::exit(1);
                    }
                    let role = if role == "owner" { "owner" } else { "editor" };
                    let hash = generate_password_hash(&password);
                    users.insert(
                        uname.clone(),
                        UserRecord {
                            password: hash,
                            role: role.to_string(),
                        },
                    );
                    drop(users);
                    if let Err(e) = persist_users_file(&state.users) {
                        eprintln!("{}: {}", yansi::Paint::new("Failed to persist users.json").red(), e);
                        process::exit(1);
                    }
                    println!("{} '{}' {}", yansi::Paint::new("User").green(), uname, yansi::Paint::new("added").green());
                }
                UserCommands::ResetPassword { username, password } => {
                    let uname = username.trim().to_lowercase();
                    let mut users = state.users.lock().unwrap();
                    if let Some(rec) = users.get_mut(&uname) {
                        rec.password = generate_password_hash(&password);
                    } else {
                        eprintln!("{} '{}' {}", yansi::Paint::new("User").red(), uname, yansi::Paint::new("not found").red());
                        process::exit(1);
                    }
                    drop(users);
                    if let Err(e) = persist_users_file(&state.users) {
                        eprintln!("{}: {}", yansi::Paint::new("Failed to persist users.json").red(), e);
                        process::exit(1);
                    }
                    println!("{} '{}' {}", yansi::Paint::new("Password for").green(), uname, yansi::Paint::new("updated").green());
                }
                UserCommands::AddOwner {
                    username,
                    password,
                    force,
                } => {
                    let uname = username.trim().to_lowercase();
                    let mut users = state.users.lock().unwrap();
                    // If an owner already exists and we're not forcing, error out
                    let owner_exists = users.values().any(|r| r.role == "owner");
                    if owner_exists && !force {
                        eprintln!(
                            "{}",
                            yansi::Paint::new("An owner user already exists; use --force to create another owner or overwrite").red()
                        );
                        process::exit(1);
                    }
                    if users.contains_key(&uname) && !force {
                        eprintln!(
                            "{} '{}' {}; {}",
                            yansi::Paint::new("User").red(),
                            uname,
                            yansi::Paint::new("already exists").red(),
                            yansi::Paint::new("use --force to overwrite").yellow()
                        );
                        process::exit(1);
                    }
                    let hash = generate_password_hash(&password);
                    users.insert(
                        uname.clone(),
                        UserRecord {
                            password: hash,
                            role: "owner".to_string(),
                        },
                    );
                    drop(users);
                    if let Err(e) = persist_users_file(&state.users) {
                        eprintln!("{}: {}", yansi::Paint::new("Failed to persist users.json").red(), e);
                        process::exit(1);
                    }
                    println!("{} '{}' {}", yansi::Paint::new("Owner").green(), uname, yansi::Paint::new("created").green());
                }
            }
        }
        Commands::Venues { sub } => {
            let state = build_state_from_env(None).await;
            match sub {
                VenueCommands::List {
                    q,
                    category,
                    country,
                    page,
                    per_page,
                } => {
                    let filter = SearchFilter {
                        q: q.unwrap_or_default(),
                        category: category.unwrap_or_default(),
                        country: country.unwrap_or_default(),
                        limit: None,
                    };
                    let venues = waypost::services::search_venues(&state.venues, &filter);
                    let total_count = venues.len();
                    let (shown, total_pages, current_page) = if page > 0 {
                        let per_page = per_page.max(1);
                        let total_pages = total_count.div_ceil(per_page).max(1);
                        let current = page.min(total_pages);
                        let start = (current - 1) * per_page;
                        (
                            venues.into_iter().skip(start).take(per_page).collect::<Vec<_>>(),
                            total_pages,
                            current,
                        )
                    } else {
                        (venues, 1, 1)
                    };

                    let mut table = new_cli_table();
                    table.set_header(vec!["ID", "Name", "Category", "City", "Country"]);
                    for v in &shown {
                        let row = VenueRow::from_venue(v);
                        table.add_row(vec![&row.id, &row.name, &row.category, &row.city, &row.country]);
                    }
                    println!("\n{table}");

                    if page > 0 && total_pages > 1 {
                        println!(
                            "\n{}",
                            yansi::Paint::new(format!(
                                "Page {} of {} | Showing {} of {} total venues",
                                current_page,
                                total_pages,
                                shown.len(),
                                total_count
                            ))
                            .cyan()
                        );
                    } else if page == 0 {
                        println!(
                            "\n{}",
                            yansi::Paint::new(format!(
                                "Showing all {} venues (use --page 1 --per-page 20 to enable pagination)",
                                total_count
                            ))
                            .dim()
                        );
                    }
                    println!();
                }
                VenueCommands::Show { venue_id } => match state.venues.get(&venue_id) {
                    Some(venue) => {
                        let value = serde_json::to_value(&venue).unwrap_or_default();
                        print_table(&value);
                    }
                    None => {
                        eprintln!("{} '{}' {}", yansi::Paint::new("Venue").red(), venue_id, yansi::Paint::new("not found").red());
                        process::exit(1);
                    }
                },
                VenueCommands::Delete { venue_id } => {
                    if state.venues.remove(&venue_id).is_none() {
                        eprintln!("{} '{}' {}", yansi::Paint::new("Venue").red(), venue_id, yansi::Paint::new("not found").red());
                        process::exit(1);
                    }
                    if let Err(e) = state.venues.persist() {
                        eprintln!("{}: {}", yansi::Paint::new("Failed to persist venues.json").red(), e);
                        process::exit(1);
                    }
                    println!("{} '{}' {}", yansi::Paint::new("Venue").green(), venue_id, yansi::Paint::new("deleted").green());
                }
                VenueCommands::Import { file } => {
                    let incoming = match parse_venue_payload_file(&file) {
                        Ok(v) => v,
                        Err(e) => {
                            eprintln!("{}: {}", yansi::Paint::new("Import failed").red(), e);
                            process::exit(1);
                        }
                    };
                    let stats = state.venues.merge(incoming);
                    if let Err(e) = state.venues.persist() {
                        eprintln!("{}: {}", yansi::Paint::new("Failed to persist venues.json").red(), e);
                        process::exit(1);
                    }
                    println!(
                        "{} {} created, {} updated",
                        yansi::Paint::new("Import complete:").green(),
                        stats.created,
                        stats.updated
                    );
                }
            }
        }
        Commands::Geo { sub } => {
            let state = build_state_from_env(None).await;
            match sub {
                GeoCommands::Nearest { lat, lng } => match state.geo.nearest_city_resolved(lat, lng) {
                    Some(city) => {
                        let value = serde_json::to_value(&city).unwrap_or_default();
                        print_table(&value);
                    }
                    None => {
                        eprintln!("{}", yansi::Paint::new("No city found (invalid coordinates or empty cities file)").red());
                        process::exit(1);
                    }
                },
                GeoCommands::Stats => {
                    let stats = handlers::admin::gather_cache_stats(&state);
                    let value = serde_json::json!({
                        "cities": stats.cities_count,
                        "index_built": stats.index_built,
                        "admin1": stats.admin1_count,
                        "slugs": stats.slugs_count,
                        "venues": stats.venues_count,
                        "hidden": stats.hidden_count,
                    });
                    print_table(&value);
                }
            }
        }
        Commands::Sync { since } => {
            let state = build_state_from_env(None).await;
            let since = match since {
                Some(raw) => match DateTime::parse_from_rfc3339(&raw) {
                    Ok(t) => Some(t.with_timezone(&Utc)),
                    Err(e) => {
                        eprintln!("{}: {}", yansi::Paint::new("Invalid --since timestamp").red(), e);
                        process::exit(1);
                    }
                },
                None => None,
            };
            match waypost::services::sync_venues(&state, since).await {
                Ok(stats) => {
                    println!(
                        "{} {} created, {} updated",
                        yansi::Paint::new("Sync complete:").green(),
                        stats.created,
                        stats.updated
                    );
                }
                Err(e) => {
                    eprintln!("{}: {}", yansi::Paint::new("Sync failed").red(), e);
                    process::exit(1);
                }
            }
        }
        Commands::Enrich => {
            let state = build_state_from_env(None).await;
            match waypost::services::enrich_venues(&state) {
                Ok(stats) => {
                    println!(
                        "{} {} of {} venues enriched",
                        yansi::Paint::new("Enrichment complete:").green(),
                        stats.enriched,
                        stats.scanned
                    );
                }
                Err(e) => {
                    eprintln!("{}: {}", yansi::Paint::new("Enrichment failed").red(), e);
                    process::exit(1);
                }
            }
        }
        Commands::Sitemap { out } => {
            let state = build_state_from_env(None).await;
            let venues: Vec<_> = state
                .venues
                .all()
                .into_iter()
                .filter(|v| !state.is_venue_hidden(&v.id))
                .collect();
            let xml = waypost::services::build_sitemap(&state.public_base_url, &venues, &state.geo.slugs);
            match out {
                Some(path) => {
                    if let Err(e) = std::fs::write(&path, xml) {
                        eprintln!("{}: {}", yansi::Paint::new("Failed to write sitemap").red(), e);
                        process::exit(1);
                    }
                    println!("{} {}", yansi::Paint::new("Sitemap written to").green(), path);
                }
                None => print!("{}", xml),
            }
        }
    }
}
