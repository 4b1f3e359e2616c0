use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use sphere_client::{Backend, ClientError, Session, SphereClient};
use sphere_core::upload::UploadKind;
use sphere_core::{
    AuthResponse, Comment, CreateComment, CreatePost, Post, UpdateCommentContent,
    UpdateCommentEmoji, UpdatePost,
};

const SESSION_FILE: &str = ".sphere_session";
const DEFAULT_HTTP_SERVER: &str = "http://127.0.0.1:8080";
const DEFAULT_STORE_PATH: &str = ".sphere_store.json";

#[derive(Debug, Parser)]
#[command(name = "sphere-cli", version, about = "CLI клиент контент-сервиса Sphere")]
struct Cli {
    /// Использовать локальное хранилище вместо сервера.
    #[arg(long, global = true)]
    local: bool,

    /// Путь к файлу локального хранилища (подразумевает --local).
    #[arg(long, global = true)]
    store_path: Option<PathBuf>,

    /// Адрес HTTP-сервера.
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация пользователя (только HTTP-бэкенд).
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Вход пользователя (только HTTP-бэкенд).
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Офлайн-вход в локальное хранилище.
    LoginOffline {
        #[arg(long)]
        username: String,
    },
    /// Сброс сохранённой сессии.
    Logout,
    /// Список постов.
    List {
        /// Показать только посты указанного автора.
        #[arg(long)]
        author: Option<Uuid>,
        /// Показать только собственные посты (требует сессию).
        #[arg(long)]
        mine: bool,
    },
    /// Получение поста по id.
    Get {
        #[arg(long)]
        id: Uuid,
    },
    /// Создание поста (требует сессию).
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        tags: Vec<String>,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        video_url: Option<String>,
    },
    /// Частичное обновление поста (требует сессию, только владелец).
    ///
    /// Пустая строка в `--image-url`/`--video-url` очищает поле.
    Update {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        tags: Option<Vec<String>>,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        video_url: Option<String>,
    },
    /// Удаление поста (требует сессию, только владелец).
    Delete {
        #[arg(long)]
        id: Uuid,
    },
    /// Переключение лайка на посте (требует сессию).
    Like {
        #[arg(long)]
        id: Uuid,
    },
    /// Список комментариев поста.
    Comments {
        #[arg(long)]
        post_id: Uuid,
        /// Точный эмодзи-фильтр; `all` отключает фильтр.
        #[arg(long)]
        emoji: Option<String>,
    },
    /// Создание комментария (требует сессию).
    Comment {
        #[arg(long)]
        post_id: Uuid,
        #[arg(long)]
        content: String,
        #[arg(long)]
        emoji: Option<String>,
    },
    /// Обновление текста комментария (требует сессию, только владелец).
    CommentUpdate {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        content: String,
    },
    /// Смена эмодзи комментария (требует сессию, только владелец).
    CommentEmoji {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        emoji: String,
    },
    /// Удаление комментария (требует сессию, только владелец).
    CommentDelete {
        #[arg(long)]
        id: Uuid,
    },
    /// Переключение лайка на комментарии (требует сессию).
    CommentLike {
        #[arg(long)]
        id: Uuid,
    },
    /// Загрузка медиафайла (требует сессию).
    Upload {
        /// Путь к файлу.
        #[arg(long)]
        file: PathBuf,
        /// Загрузить как видео (по умолчанию — изображение).
        #[arg(long)]
        video: bool,
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
    let cli = Cli::parse();

    let backend = resolve_backend(cli.local, cli.store_path, cli.server);
    let mut client = SphereClient::new(backend).map_err(map_client_error)?;

    if let Some(session) = load_session().context("не удалось прочитать .sphere_session")? {
        client.set_session(session);
    }

    match cli.command {
        Command::Register { username, password } => {
            let result = client
                .register(&username, &password)
                .await
                .map_err(map_client_error)?;
            println!("{}", result.message);
        }
        Command::Login { username, password } => {
            let auth = client
                .login(&username, &password)
                .await
                .map_err(map_client_error)?;
            persist_session(&client).context("не удалось сохранить сессию")?;
            print_auth("Вход выполнен", &auth);
        }
        Command::LoginOffline { username } => {
            let session = client
                .login_offline(&username)
                .await
                .map_err(map_client_error)?;
            persist_session(&client).context("не удалось сохранить сессию")?;
            println!("Офлайн-вход выполнен");
            println!("  id: {}", session.user.id);
            println!("  username: {}", session.user.username);
        }
        Command::Logout => {
            client.logout();
            persist_session(&client).context("не удалось удалить сессию")?;
            println!("Сессия сброшена");
        }
        Command::List { author, mine } => {
            let posts = if mine {
                client.my_posts().await
            } else {
                client.list_posts(author).await
            };
            let posts = posts.map_err(map_client_error)?;
            print_post_list(&posts);
        }
        Command::Get { id } => {
            let post = client.get_post(id).await.map_err(map_client_error)?;
            print_post("Пост", &post);
        }
        Command::Create {
            title,
            content,
            tags,
            image_url,
            video_url,
        } => {
            let post = client
                .create_post(CreatePost {
                    title,
                    content,
                    tags,
                    image_url,
                    video_url,
                })
                .await
                .map_err(map_client_error)?;
            print_post("Пост создан", &post);
        }
        Command::Update {
            id,
            title,
            content,
            tags,
            image_url,
            video_url,
        } => {
            let post = client
                .update_post(
                    id,
                    UpdatePost {
                        title,
                        content,
                        tags,
                        image_url,
                        video_url,
                    },
                )
                .await
                .map_err(map_client_error)?;
            print_post("Пост обновлён", &post);
        }
        Command::Delete { id } => {
            let result = client.delete_post(id).await.map_err(map_client_error)?;
            println!("{}", result.message);
        }
        Command::Like { id } => {
            let post = client
                .toggle_post_like(id)
                .await
                .map_err(map_client_error)?;
            println!("Лайков на посте {}: {}", post.id, post.likes.len());
        }
        Command::Comments { post_id, emoji } => {
            let comments = client
                .list_comments(post_id, emoji.as_deref())
                .await
                .map_err(map_client_error)?;
            print_comment_list(&comments);
        }
        Command::Comment {
            post_id,
            content,
            emoji,
        } => {
            let comment = client
                .create_comment(CreateComment {
                    content,
                    post_id,
                    emoji,
                })
                .await
                .map_err(map_client_error)?;
            print_comment("Комментарий создан", &comment);
        }
        Command::CommentUpdate { id, content } => {
            let comment = client
                .update_comment(id, UpdateCommentContent { content })
                .await
                .map_err(map_client_error)?;
            print_comment("Комментарий обновлён", &comment);
        }
        Command::CommentEmoji { id, emoji } => {
            let comment = client
                .update_comment_emoji(id, UpdateCommentEmoji { emoji })
                .await
                .map_err(map_client_error)?;
            print_comment("Эмодзи обновлён", &comment);
        }
        Command::CommentDelete { id } => {
            let result = client.delete_comment(id).await.map_err(map_client_error)?;
            println!("{}", result.message);
        }
        Command::CommentLike { id } => {
            let comment = client
                .toggle_comment_like(id)
                .await
                .map_err(map_client_error)?;
            println!(
                "Лайков на комментарии {}: {}",
                comment.id,
                comment.likes.len()
            );
        }
        Command::Upload { file, video } => {
            let kind = if video {
                UploadKind::Video
            } else {
                UploadKind::Image
            };
            let filename = file
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| kind.as_str().to_string());
            let mimetype = guess_mime(&filename).to_string();
            let bytes = fs::read(&file)
                .with_context(|| format!("не удалось прочитать файл {}", file.display()))?;

            let result = client
                .upload(kind, &filename, &mimetype, bytes)
                .await
                .map_err(map_client_error)?;
            println!("Файл загружен");
            println!("  url: {}", result.url);
            println!("  size: {}", result.size);
        }
    }

    // Отклонённая бэкендом сессия уже сброшена в клиенте; синхронизируем файл.
    persist_session(&client).context("не удалось обновить файл сессии")?;
    Ok(())
}

fn resolve_backend(local: bool, store_path: Option<PathBuf>, server: Option<String>) -> Backend {
    if local || store_path.is_some() {
        let path = store_path.unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH));
        return Backend::Local(path);
    }

    let raw = server.unwrap_or_else(|| DEFAULT_HTTP_SERVER.to_string());
    Backend::Http(normalize_server(raw))
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn load_session() -> io::Result<Option<Session>> {
    if !Path::new(SESSION_FILE).exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(SESSION_FILE)?;
    Ok(serde_json::from_str(&raw).ok())
}

fn persist_session(client: &SphereClient) -> io::Result<()> {
    match client.session() {
        Some(session) => {
            let raw = serde_json::to_string_pretty(session)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
            fs::write(SESSION_FILE, raw)
        }
        None => {
            if Path::new(SESSION_FILE).exists() {
                fs::remove_file(SESSION_FILE)?;
            }
            Ok(())
        }
    }
}

fn guess_mime(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" | "ogv" => "video/ogg",
        "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}

fn map_client_error(err: ClientError) -> anyhow::Error {
    let message = match err {
        ClientError::MissingSession => {
            "требуется сессия: выполните `sphere-cli login ...` или `sphere-cli login-offline ...`"
                .to_string()
        }
        ClientError::Api(failure) => {
            if failure.violations.is_empty() {
                format!("отказ API: {failure}")
            } else {
                format!("отказ API: {failure}; нарушения: {}", failure.violations.join("; "))
            }
        }
        ClientError::Http(err) => format!("ошибка HTTP: {err}"),
    };
    anyhow::anyhow!(message)
}

fn print_auth(title: &str, auth: &AuthResponse) {
    println!("{title}");
    println!("token: {}", auth.token);
    println!("user:");
    println!("  id: {}", auth.user.id);
    println!("  username: {}", auth.user.username);
}

fn print_post(title: &str, post: &Post) {
    println!("{title}");
    println!("id: {}", post.id);
    println!("title: {}", post.title);
    println!("content: {}", post.content);
    println!("author: {} ({})", post.author.username, post.author.id);
    if !post.tags.is_empty() {
        println!("tags: {}", post.tags.join(", "));
    }
    if let Some(image_url) = &post.image_url {
        println!("image_url: {image_url}");
    }
    if let Some(video_url) = &post.video_url {
        println!("video_url: {video_url}");
    }
    println!("likes: {}", post.likes.len());
    println!("created_at: {}", post.created_at);
    println!("updated_at: {}", post.updated_at);
}

fn print_post_list(posts: &[Post]) {
    println!("Постов: {}", posts.len());
    for post in posts {
        println!(
            "- [{}] {} (автор: {}, лайков: {})",
            post.id,
            post.title,
            post.author.username,
            post.likes.len()
        );
    }
}

fn print_comment(title: &str, comment: &Comment) {
    println!("{title}");
    println!("id: {}", comment.id);
    println!("post_id: {}", comment.post_id);
    println!("content: {}", comment.content);
    println!("emoji: {}", comment.emoji);
    println!(
        "author: {} ({})",
        comment.author.username, comment.author.id
    );
    println!("likes: {}", comment.likes.len());
}

fn print_comment_list(comments: &[Comment]) {
    println!("Комментариев: {}", comments.len());
    for comment in comments {
        println!(
            "- [{}] {} {} (автор: {}, лайков: {})",
            comment.id,
            comment.emoji,
            comment.content,
            comment.author.username,
            comment.likes.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_server_keeps_scheme() {
        let s = normalize_server("https://example.com:8080".to_string());
        assert_eq!(s, "https://example.com:8080");
    }

    #[test]
    fn normalize_server_adds_http_scheme() {
        let s = normalize_server("127.0.0.1:8080".to_string());
        assert_eq!(s, "http://127.0.0.1:8080");
    }

    #[test]
    fn resolve_backend_defaults_to_http() {
        match resolve_backend(false, None, None) {
            Backend::Http(url) => assert_eq!(url, DEFAULT_HTTP_SERVER),
            Backend::Local(_) => panic!("expected HTTP backend"),
        }
    }

    #[test]
    fn store_path_implies_local_backend() {
        match resolve_backend(false, Some(PathBuf::from("data.json")), None) {
            Backend::Local(path) => assert_eq!(path, PathBuf::from("data.json")),
            Backend::Http(_) => panic!("expected local backend"),
        }
    }

    #[test]
    fn local_flag_uses_default_store_path() {
        match resolve_backend(true, None, None) {
            Backend::Local(path) => assert_eq!(path, PathBuf::from(DEFAULT_STORE_PATH)),
            Backend::Http(_) => panic!("expected local backend"),
        }
    }

    #[test]
    fn guess_mime_covers_common_extensions() {
        assert_eq!(guess_mime("photo.PNG"), "image/png");
        assert_eq!(guess_mime("clip.mp4"), "video/mp4");
        assert_eq!(guess_mime("noext"), "application/octet-stream");
    }
}
