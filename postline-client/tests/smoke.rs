use postline_client::{CmsClient, PostFeed};

#[tokio::test]
#[ignore = "requires a reachable content repository"]
async fn feed_smoke_flow() {
    let base_url =
        std::env::var("CMS_API_URL").expect("CMS_API_URL must point to the content API");
    let mut client = CmsClient::new(base_url);
    if let Ok(token) = std::env::var("CMS_ACCESS_TOKEN") {
        client = client.with_access_token(token);
    }

    let first = client.query_posts(1).await.expect("query_posts must succeed");
    let mut feed = PostFeed::new(first);
    for post in feed.posts() {
        assert!(!post.uid.is_empty());
    }

    if feed.can_load_more() {
        let shown = feed.posts().len();
        let appended = feed
            .load_more(&client)
            .await
            .expect("load_more must succeed");
        assert_eq!(feed.posts().len(), shown + appended);
    }

    if let Some(post) = feed.posts().first() {
        let detail = client
            .get_by_uid(&post.uid)
            .await
            .expect("get_by_uid must succeed");
        assert_eq!(detail.uid, post.uid);
    }
}
