use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};
use dialoguer::Input;

use preview_finder::config::{self, SpotifyConfig};
use preview_finder::core::downloader::{DownloadOutcome, PreviewDownloader};
use preview_finder::core::{parser, tagger};
use preview_finder::sources::spotify::SpotifyAuth;
use preview_finder::sources::token::TokenCache;
use preview_finder::sources::web::build_http_client;
use preview_finder::{PreviewFinder, ResultEnvelope, SearchRequest, DEFAULT_LIMIT};

const RESULT_START: &str = "JSON_RESULT_START";
const RESULT_END: &str = "JSON_RESULT_END";

#[derive(Parser)]
#[command(
    name = "preview-finder",
    about = "Spotify 곡 검색 및 미리듣기 URL 추출기",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// 검색할 곡 제목
    #[arg(value_name = "SONG")]
    pub song: Option<String>,

    /// 아티스트 이름 (선택)
    #[arg(value_name = "ARTIST")]
    pub artist: Option<String>,

    /// 가져올 최대 트랙 수
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 곡을 검색하여 결과를 JSON으로 출력 (제목이 명령어 이름과 같을 때 사용)
    Find {
        /// 검색할 곡 제목
        song: Option<String>,
        /// 아티스트 이름 (선택)
        artist: Option<String>,
        /// 가져올 최대 트랙 수
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
    /// 곡을 검색하여 첫 번째 미리듣기를 다운로드
    Download {
        /// 곡 제목
        song: String,
        /// 아티스트 이름
        artist: Option<String>,
        #[arg(long, default_value = "previews")]
        output_dir: PathBuf,
        /// ID3 태그를 기록하지 않음
        #[arg(long)]
        no_tag: bool,
    },
    /// 목록 파일의 곡들을 차례로 다운로드 (한 줄에 "제목 - 아티스트")
    Batch {
        /// 곡 목록 파일
        file: PathBuf,
        #[arg(long, default_value = "previews")]
        output_dir: PathBuf,
        /// ID3 태그를 기록하지 않음
        #[arg(long)]
        no_tag: bool,
    },
    /// Spotify 자격증명 설정
    Config,
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Find {
            song,
            artist,
            limit,
        }) => cmd_find(song, artist, limit).await,
        Some(Commands::Download {
            song,
            artist,
            output_dir,
            no_tag,
        }) => cmd_download(&song, artist.as_deref(), &output_dir, !no_tag).await,
        Some(Commands::Batch {
            file,
            output_dir,
            no_tag,
        }) => cmd_batch(&file, &output_dir, !no_tag).await,
        Some(Commands::Config) => cmd_config(),
        None => cmd_find(cli.song, cli.artist, cli.limit).await,
    }
}

/// 결과 봉투를 구분 줄 사이에 JSON으로 출력한다.
/// 실패도 봉투로 출력하며 종료 코드는 바꾸지 않는다.
async fn cmd_find(song: Option<String>, artist: Option<String>, limit: usize) -> Result<()> {
    let cfg = config::load_config();

    let envelope = match PreviewFinder::from_config(&cfg) {
        Ok(finder) => {
            let mut request = SearchRequest::new(song.unwrap_or_default()).with_limit(limit);
            if let Some(artist) = artist {
                request = request.with_artist(artist);
            }
            Some(finder.find(&request).await)
        }
        Err(e) => {
            eprintln!("오류: {}", e);
            None
        }
    };

    print_envelope(envelope.as_ref())
}

fn print_envelope(envelope: Option<&ResultEnvelope>) -> Result<()> {
    println!("{}", format_envelope(envelope)?);
    Ok(())
}

/// 봉투가 없으면 구분 줄 사이에 `null`을 넣는다.
fn format_envelope(envelope: Option<&ResultEnvelope>) -> Result<String> {
    let json = serde_json::to_string_pretty(&envelope).context("결과 직렬화에 실패했습니다")?;
    Ok(format!("{RESULT_START}\n{json}\n{RESULT_END}"))
}

/// 다운로드 명령들이 공유하는 검색기와 다운로더.
/// 여러 곡을 처리하므로 토큰은 캐시해서 재사용한다.
struct Session {
    finder: PreviewFinder,
    downloader: PreviewDownloader,
    write_tags: bool,
}

impl Session {
    fn new(output_dir: &Path, write_tags: bool) -> Result<Self> {
        let cfg = config::load_config();
        let credentials = cfg.spotify.clone().with_env_overrides().credentials()?;
        let client = build_http_client(Duration::from_secs(cfg.finder.timeout_secs))
            .context("HTTP 클라이언트 생성에 실패했습니다")?;

        let tokens = Arc::new(TokenCache::new(SpotifyAuth::new(client.clone(), credentials)));
        let finder = PreviewFinder::spotify_with_tokens(client.clone(), tokens, &cfg.finder);
        let downloader = PreviewDownloader::new(client, output_dir);

        Ok(Self {
            finder,
            downloader,
            write_tags,
        })
    }

    async fn download(&self, song: &str, artist: Option<&str>) -> Status {
        match artist {
            Some(artist) => println!("검색 중: \"{}\" - \"{}\"", song, artist),
            None => println!("검색 중: \"{}\"", song),
        }

        let envelope = match artist {
            Some(artist) => self.finder.find_by_song_and_artist(song, artist, 1).await,
            None => self.finder.find_by_song(song, 1).await,
        };

        let Some(track) = envelope.results.first() else {
            let reason = envelope.error.unwrap_or_else(|| "No songs found".to_string());
            println!("  ✗ 검색 결과가 없습니다: {}", reason);
            return Status::NotFound(reason);
        };

        println!("  찾음: {}", track.name);
        println!("  앨범: {}", track.album_name);
        println!("  발매일: {}", track.release_date);
        println!("  인기도: {}/100", track.popularity);

        match self.downloader.save(song, artist, track).await {
            Ok(DownloadOutcome::NoPreview) => {
                println!("  ✗ 미리듣기 URL이 없습니다");
                Status::NoPreview
            }
            Ok(DownloadOutcome::AlreadyExists(path)) => {
                println!("  파일이 이미 존재합니다: {}", path.display());
                Status::Exists
            }
            Ok(DownloadOutcome::Downloaded(path)) => {
                if self.write_tags {
                    if let Err(e) = tagger::write_preview_tags(&path, track) {
                        println!("  태그 기록 실패: {}", e);
                    }
                }
                println!("  ✓ 다운로드 완료: {}", path.display());
                Status::Downloaded
            }
            Err(e) => {
                println!("  ✗ 다운로드 실패: {:#}", e);
                Status::Failed(format!("{:#}", e))
            }
        }
    }
}

enum Status {
    Downloaded,
    Exists,
    NoPreview,
    NotFound(String),
    Failed(String),
}

impl Status {
    fn is_success(&self) -> bool {
        matches!(self, Status::Downloaded | Status::Exists)
    }

    fn describe(&self) -> String {
        match self {
            Status::Downloaded => "다운로드".to_string(),
            Status::Exists => "이미 있음".to_string(),
            Status::NoPreview => "미리듣기 없음".to_string(),
            Status::NotFound(reason) => format!("검색 실패: {}", reason),
            Status::Failed(reason) => format!("오류: {}", reason),
        }
    }
}

async fn cmd_download(
    song: &str,
    artist: Option<&str>,
    output_dir: &Path,
    write_tags: bool,
) -> Result<()> {
    let session = Session::new(output_dir, write_tags)?;
    session.download(song, artist).await;
    Ok(())
}

async fn cmd_batch(file: &Path, output_dir: &Path, write_tags: bool) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("목록 파일을 읽을 수 없습니다: {}", file.display()))?;
    let songs: Vec<_> = content.lines().filter_map(parser::parse_song_line).collect();

    if songs.is_empty() {
        println!("{}에 곡이 없습니다", file.display());
        return Ok(());
    }

    let session = Session::new(output_dir, write_tags)?;
    let mut rows = Vec::with_capacity(songs.len());

    for (i, (song, artist)) in songs.iter().enumerate() {
        println!("\n{}/{} {}", i + 1, songs.len(), "-".repeat(40));
        let status = session.download(song, artist.as_deref()).await;
        rows.push((song, artist, status));
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "곡", "아티스트", "결과"]);
    for (i, (song, artist, status)) in rows.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(song),
            Cell::new(artist.as_deref().unwrap_or("-")),
            Cell::new(status.describe()),
        ]);
    }

    let succeeded = rows.iter().filter(|(_, _, s)| s.is_success()).count();
    println!("\n{table}");
    println!(
        "\n총 {} 곡 (성공: {}, 실패: {})",
        rows.len(),
        succeeded,
        rows.len() - succeeded,
    );
    println!("저장 위치: {}", session.downloader.output_dir().display());

    Ok(())
}

fn cmd_config() -> Result<()> {
    let mut cfg = config::load_config();

    println!("Spotify API 설정");
    println!("(자격증명은 https://developer.spotify.com/dashboard 에서 발급받으세요)");
    println!(
        "({}, {} 환경 변수가 있으면 그 값이 우선합니다)\n",
        config::CLIENT_ID_VAR,
        config::CLIENT_SECRET_VAR
    );

    let current_id = cfg.spotify.client_id.clone().unwrap_or_default();

    let client_id: String = Input::new()
        .with_prompt("Client ID")
        .with_initial_text(current_id)
        .interact_text()?;

    let current_secret = cfg.spotify.client_secret.clone().unwrap_or_default();

    let client_secret: String = Input::new()
        .with_prompt("Client Secret")
        .with_initial_text(current_secret)
        .interact_text()?;

    cfg.spotify = SpotifyConfig {
        client_id: Some(client_id),
        client_secret: Some(client_secret),
    };

    config::save_config(&cfg)?;
    println!("\n설정이 저장되었습니다!");
    Ok(())
}
