use clap::Parser;
use improfessor_client::config::Command;
use improfessor_client::utils::{logger, validation::Validate};
use improfessor_client::{App, CliConfig};
use std::io::{stdin, stdout, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化：logger → 設定驗證 → session 復原
    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting improfessor CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = cli.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let mut app = match App::new(&cli) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("❌ Initialization failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let mut input = BufReader::new(stdin());
    let mut out = stdout();

    let result = match cli.command.clone() {
        Command::Login {
            email,
            password,
            kakao,
        } => app.login(&mut input, &mut out, email, password, kakao).await,
        Command::KakaoCallback { url } => app.kakao_callback(&mut input, &mut out, &url).await,
        Command::Signup => app.signup(&mut input, &mut out).await,
        Command::Logout => app.logout(&mut input, &mut out).await,
        Command::Generate {
            concept_files,
            format_files,
        } => {
            app.generate(&mut input, &mut out, concept_files, format_files)
                .await
        }
        Command::Result { url, save_pdf } => {
            app.show_result(&mut input, &mut out, &url, save_pdf).await
        }
        Command::Notices { page } => app.show_notices(&mut input, &mut out, page).await,
        Command::Account => app.account(&mut input, &mut out).await,
    };

    if let Err(e) = result {
        tracing::error!("❌ Command failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    Ok(())
}
