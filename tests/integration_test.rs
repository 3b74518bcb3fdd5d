use recipe_scraper::browser::SessionLauncher;
use recipe_scraper::sources::{RecipeSource, Tesco};
use recipe_scraper::{logging, ChromeLauncher, Config, Navigator};

#[tokio::test]
#[ignore] // 默认忽略，需要本机 Chromium 和网络：cargo test -- --ignored
async fn test_launch_and_close_browser() {
    // 初始化日志
    logging::init(true);

    // 加载配置
    let config = Config::from_env();

    let launcher = ChromeLauncher::new(&config);
    let session = launcher.launch().await.expect("启动浏览器失败");
    let mut nav = Navigator::new(session, config.retry_policy(), config.navigation_timeout());

    nav.navigate("about:blank").await.expect("导航失败");
    let html = nav.html().await.expect("读取页面失败");
    assert!(html.contains("<html"));

    nav.close().await;
}

#[tokio::test]
#[ignore]
async fn test_tesco_listing_live() {
    logging::init(true);
    let config = Config::from_env();

    let session = ChromeLauncher::new(&config)
        .launch()
        .await
        .expect("启动浏览器失败");
    let mut nav = Navigator::new(session, config.retry_policy(), config.navigation_timeout());

    let urls = Tesco.list(&mut nav, 3).await.expect("列表页不可用");
    println!("找到 {} 个菜谱链接", urls.len());
    assert!(urls.len() <= 3);

    if let Some(url) = urls.first() {
        let draft = Tesco.fetch(&mut nav, url).await.expect("抓取失败");
        println!("{:?}", draft.map(|d| d.title));
    }

    nav.close().await;
}
