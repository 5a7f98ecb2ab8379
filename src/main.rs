use clap::Parser;
use idcard_client::{cli, commands, config, error, http, sheet, still_camera};
use cli::{Cli, Commands};
use config::Config;
use error::{ClientError, Result};
use http::{HttpBackend, HttpPhotoLoader, SubmitReply};
use idcard_common::{submit_upload, FormSession, IdentifierOutcome, LookupOutcome, UploadFile};
use still_camera::StillCamera;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_warning(session: &FormSession) {
    if let Some(message) = session.lookup.warning().message() {
        println!("{}", message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Lookup { nik, photo_out } => {
            println!("🔎 idcard - NIK検索\n");

            let backend = HttpBackend::new(&config)?;
            let loader = HttpPhotoLoader::new(&backend);
            let camera = StillCamera::new(None);
            let mut session = FormSession::new(config.photo_base());
            session.lookup.form_mut().nik = nik.clone();

            match session.lookup_by_identifier(&backend, &loader, &camera, &nik).await? {
                None => println!("NIKが空です"),
                Some(LookupOutcome::Rejected(_)) => print_warning(&session),
                Some(LookupOutcome::Stale) => {}
                Some(LookupOutcome::Loaded { .. }) => {
                    println!("✔ レコードが見つかりました");
                    for line in commands::describe_form(&session) {
                        println!("{}", line);
                    }

                    if let Some(path) = photo_out {
                        if session.capture.payload().is_empty() {
                            println!("写真を取得できませんでした");
                        } else {
                            commands::save_payload(session.capture.payload(), &path)?;
                            println!("✔ 写真を保存: {}", path.display());
                        }
                    }
                }
            }
        }

        Commands::NewId { status } => {
            let backend = HttpBackend::new(&config)?;
            let mut session = FormSession::new(config.photo_base());

            match session.resolve_identifier_for_status(&backend, &status).await? {
                IdentifierOutcome::Assigned(user_id) => {
                    let form = session.lookup.form();
                    println!("✔ {} ({}): {}", form.status.category(), status, user_id);
                }
                IdentifierOutcome::Rejected(_) => print_warning(&session),
                IdentifierOutcome::Stale => {}
            }
        }

        Commands::Register { nik, status, photo, record, dry_run } => {
            println!("📝 idcard - 登録\n");

            let backend = HttpBackend::new(&config)?;
            let loader = HttpPhotoLoader::new(&backend);
            let camera = StillCamera::new(photo);

            println!("[1/2] フォームを準備中...");
            let session = commands::prepare_registration(
                &backend,
                &loader,
                &camera,
                config.photo_base(),
                &nik,
                &status,
                &record,
            )
            .await?;
            for line in commands::describe_form(&session) {
                println!("{}", line);
            }
            println!();

            if dry_run {
                println!("(dry-run) 送信しません");
                return Ok(());
            }

            println!("[2/2] 送信中...");
            let submission = session.submission();
            match backend.submit_form(&submission).await? {
                SubmitReply::Accepted => {
                    println!("\n✅ {} 完了", session.lookup.form().submit_label);
                }
                SubmitReply::Rejected(message) => {
                    println!("⚠️ {}", message);
                    return Err(ClientError::Server(message));
                }
            }
        }

        Commands::Upload { file, force } => {
            println!("📤 idcard - 一括アップロード\n");

            println!("[1/2] シートを確認中...");
            let report = sheet::inspect(&file)?;
            println!("✔ {}行を検出", report.rows.len());
            if !report.is_complete() {
                println!("⚠️ 不完全な行: {}", report.incomplete_summary());
                if !force {
                    return Err(ClientError::IncompleteRows(report.incomplete_summary()));
                }
            }

            println!("[2/2] アップロード中...");
            let backend = HttpBackend::new(&config)?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "upload.xlsx".to_string());
            let upload = UploadFile {
                name,
                bytes: tokio::fs::read(&file).await?,
            };
            let notice = submit_upload(&backend, vec![upload]).await?;
            println!("{}", notice);
        }

        Commands::Template { output } => {
            sheet::write_template(&output)?;
            println!("✔ テンプレートを作成: {}", output.display());
        }

        Commands::Download { uid, kind, output } => {
            let backend = HttpBackend::new(&config)?;
            let bytes = backend.download(&uid, kind).await?;
            let path = commands::download_path(&uid, kind, output);
            tokio::fs::write(&path, &bytes).await?;
            println!("✔ {} bytes を保存: {}", bytes.len(), path.display());
        }

        Commands::Config { set_base_url, set_photo_base, show } => {
            let mut config = config;
            let changed = set_base_url.is_some() || set_photo_base.is_some();

            if let Some(url) = set_base_url {
                config.set_base_url(&url)?;
                println!("✔ 接続先を設定しました");
            }
            if let Some(url) = set_photo_base {
                config.photo_base = Some(url.trim_end_matches('/').to_string());
                println!("✔ 写真の取得元を設定しました");
            }
            if changed {
                config.save()?;
            }

            if show || !changed {
                println!("設定:");
                println!("  接続先: {}", config.base_url);
                println!("  写真の取得元: {}", config.photo_base());
                println!("  タイムアウト: {}秒", config.timeout_seconds);
            }
        }
    }

    Ok(())
}
