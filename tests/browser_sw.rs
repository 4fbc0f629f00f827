//! Service worker integration tests: verifies the SW lifecycle and its
//! stale-while-revalidate cache.
//!
//! These tests use headless Chrome over a local HTTP server (service workers
//! require HTTP, not file://) to exercise cached and non-cached code paths.
//!
//! Run with: `cargo test --test browser_sw -- --ignored`

use headless_chrome::{Browser, LaunchOptions, Tab};
use std::io::{Read as _, Write as _};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;

// ===========================================================================
// Static file server (service workers need an HTTP origin)
// ===========================================================================

struct TestServer {
    url: String,
}

impl TestServer {
    /// Serve `root` from a background thread for the rest of the test run.
    fn start(root: PathBuf) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let root = root.clone();
                thread::spawn(move || respond(stream, &root));
            }
        });
        Self { url }
    }
}

/// Answer one GET with the file at its path, `index.html` for directories.
fn respond(mut stream: TcpStream, root: &Path) {
    let mut buf = [0u8; 4096];
    let Ok(n) = stream.read(&mut buf) else {
        return;
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let path = request.split_whitespace().nth(1).unwrap_or("/");
    let mut file = root.join(path.trim_start_matches('/'));
    if file.is_dir() {
        file = file.join("index.html");
    }

    let (status, body) = match std::fs::read(&file) {
        Ok(body) => ("200 OK", body),
        Err(_) => ("404 Not Found", Vec::new()),
    };
    let header = format!(
        "HTTP/1.1 {status}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        content_type(&file),
        body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    let _ = stream.write_all(&body);
}

fn content_type(file: &Path) -> &'static str {
    match file.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "text/javascript",
        Some("webmanifest") => "application/manifest+json",
        Some("xml") => "application/rss+xml",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

// ===========================================================================
// Setup helpers
// ===========================================================================

fn generated_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("browser-sw/dist")
}

fn ensure_fixtures_built() {
    static BUILT: OnceLock<()> = OnceLock::new();
    BUILT.get_or_init(|| {
        let bin = env!("CARGO_BIN_EXE_folio");
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let work = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("browser-sw");
        let status = Command::new(bin)
            .args([
                "build",
                "--source",
                root.join("fixtures/content").to_str().unwrap(),
                "--output",
                generated_dir().to_str().unwrap(),
                "--temp-dir",
                work.join(".folio-temp").to_str().unwrap(),
            ])
            .status()
            .expect("failed to run folio");
        assert!(status.success(), "fixture generation failed");
    });
}

fn browser() -> &'static Browser {
    static B: OnceLock<Browser> = OnceLock::new();
    B.get_or_init(|| {
        Browser::new(LaunchOptions {
            window_size: Some((1280, 800)),
            ..Default::default()
        })
        .expect("failed to launch Chrome")
    })
}

fn start_server() -> TestServer {
    ensure_fixtures_built();
    TestServer::start(generated_dir())
}

/// Cache name baked into the generated `sw.js`.
fn cache_name() -> String {
    let sw = std::fs::read_to_string(generated_dir().join("sw.js")).unwrap();
    sw.lines()
        .find_map(|l| l.strip_prefix("const CACHE_NAME = \""))
        .and_then(|rest| rest.split('"').next())
        .expect("CACHE_NAME not found in sw.js")
        .to_string()
}

/// Wait for the service worker to reach the `activated` state.
/// Panics after 10 s if the SW never activates (install/activate failed).
fn wait_for_sw(tab: &Tab) {
    tab.evaluate(
        r#"Promise.race([
            navigator.serviceWorker.ready.then((reg) => {
                const sw = reg.active;
                if (sw && sw.state === 'activated') return 'ok';
                return new Promise((resolve) => {
                    sw.addEventListener('statechange', () => {
                        if (sw.state === 'activated') resolve('ok');
                    });
                });
            }),
            new Promise((_, reject) =>
                setTimeout(() => reject('SW activation timeout (10 s)'), 10000)
            ),
        ])"#,
        true,
    )
    .expect("service worker failed to activate");
}

/// First load registers the worker; the reload puts the page under its control.
fn load_controlled(tab: &Tab, server: &TestServer) {
    tab.navigate_to(&server.url)
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    wait_for_sw(tab);
    tab.navigate_to(&server.url)
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    thread::sleep(Duration::from_millis(300));
}

fn eval_bool(tab: &Tab, js: &str) -> bool {
    tab.evaluate(js, true)
        .unwrap()
        .value
        .unwrap()
        .as_bool()
        .unwrap()
}

// ===========================================================================
// First load (no cache)
// ===========================================================================

#[test]
#[ignore]
fn sw_activates_on_first_load() {
    let server = start_server();
    let tab = browser().new_tab().unwrap();
    tab.navigate_to(&server.url)
        .unwrap()
        .wait_until_navigated()
        .unwrap();

    wait_for_sw(&tab);
}

#[test]
#[ignore]
fn sw_precaches_pages_on_install() {
    let server = start_server();
    let tab = browser().new_tab().unwrap();
    tab.navigate_to(&server.url)
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    wait_for_sw(&tab);

    let js = format!(
        r#"(async () => {{
            const cache = await caches.open('{}');
            const keys = await cache.keys();
            return JSON.stringify(keys.map(r => new URL(r.url).pathname));
        }})()"#,
        cache_name()
    );
    let result = tab.evaluate(&js, true).unwrap();
    let urls: Vec<String> = serde_json::from_str(result.value.unwrap().as_str().unwrap()).unwrap();

    for expected in ["/", "/hello-world/", "/about/", "/404.html", "/manifest.webmanifest"] {
        assert!(
            urls.iter().any(|u| u == expected),
            "should cache {expected}, got: {urls:?}"
        );
    }
}

// ===========================================================================
// Second load (from cache, SW controls the page)
// ===========================================================================

#[test]
#[ignore]
fn sw_controls_page_after_reload() {
    let server = start_server();
    let tab = browser().new_tab().unwrap();
    load_controlled(&tab, &server);

    assert!(
        eval_bool(&tab, "!!navigator.serviceWorker.controller"),
        "SW should control page after reload"
    );
}

// ===========================================================================
// Stale-while-revalidate strategy
// ===========================================================================

#[test]
#[ignore]
fn sw_stale_while_revalidate_caches_and_serves() {
    let server = start_server();
    let tab = browser().new_tab().unwrap();
    load_controlled(&tab, &server);

    // Not precached, so the first fetch goes to the network and fills the cache
    assert!(
        eval_bool(&tab, "fetch('/hello-world/cover.png').then(r => r.ok)"),
        "first SWR fetch should succeed"
    );
    thread::sleep(Duration::from_millis(500));

    let js = format!(
        r#"(async () => {{
            const cache = await caches.open('{}');
            return !!(await cache.match('/hello-world/cover.png'));
        }})()"#,
        cache_name()
    );
    assert!(eval_bool(&tab, &js), "cover should be cached after SWR fetch");

    assert!(
        eval_bool(&tab, "fetch('/hello-world/cover.png').then(r => r.ok)"),
        "second SWR fetch (from cache) should succeed"
    );
}

// ===========================================================================
// Error responses must NOT be cached
// ===========================================================================

#[test]
#[ignore]
fn sw_does_not_cache_error_responses() {
    let server = start_server();
    let tab = browser().new_tab().unwrap();
    load_controlled(&tab, &server);

    tab.evaluate("fetch('/does-not-exist-xyz').catch(() => null)", true)
        .unwrap();
    thread::sleep(Duration::from_millis(500));

    let js = format!(
        r#"(async () => {{
            const cache = await caches.open('{}');
            return !!(await cache.match('/does-not-exist-xyz'));
        }})()"#,
        cache_name()
    );
    assert!(
        !eval_bool(&tab, &js),
        "404 responses should NOT be cached (response.ok guard)"
    );
}

// ===========================================================================
// Old caches are dropped on activation
// ===========================================================================

#[test]
#[ignore]
fn sw_deletes_stale_folio_caches() {
    let server = start_server();
    let tab = browser().new_tab().unwrap();
    tab.navigate_to(&server.url)
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    wait_for_sw(&tab);

    // Seed a cache from an older build, then force a fresh activation
    tab.evaluate(
        r#"(async () => {
            await caches.open('folio-000000000000');
            const reg = await navigator.serviceWorker.ready;
            await reg.unregister();
            return true;
        })()"#,
        true,
    )
    .unwrap();
    tab.navigate_to(&server.url)
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    wait_for_sw(&tab);
    thread::sleep(Duration::from_millis(300));

    assert!(
        !eval_bool(&tab, "caches.has('folio-000000000000')"),
        "caches from older builds should be deleted on activate"
    );
}
