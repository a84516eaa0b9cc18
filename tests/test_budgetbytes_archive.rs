mod common;

#[cfg(test)]
mod tests {
    use crate::common::*;
    use mockito::{Matcher, Server};
    use recipe_harvest::sources::BudgetBytes;
    use recipe_harvest::{DateRange, HarvestError, RecipeSource};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_range_harvest_is_newest_first() {
        let mut server = Server::new_async().await;
        let base = server.url();

        let february = vec![format!("{base}/one-pot-pasta/"), format!("{base}/chili/")];
        let january = vec![format!("{base}/lentil-soup/")];
        let feb_mock = server
            .mock("GET", "/archive/2024/2")
            .with_status(200)
            .with_body(budgetbytes_archive(&february))
            .create_async()
            .await;
        let jan_mock = server
            .mock("GET", "/archive/2024/1")
            .with_status(200)
            .with_body(budgetbytes_archive(&january))
            .create_async()
            .await;
        for (path, name) in [
            ("/one-pot-pasta/", "One Pot Pasta"),
            ("/chili/", "Chili"),
            ("/lentil-soup/", "Lentil Soup"),
        ] {
            server
                .mock("GET", path)
                .with_status(200)
                .with_body(budgetbytes_recipe(name, 30))
                .create_async()
                .await;
        }

        let harvester = http_harvester();
        let source = harvester.budget_bytes().with_base_url(base.clone());
        let range = DateRange::new(2024, 1, 2024, 2).unwrap();
        let recipes = harvester.harvest_range(&source, 10, range).await.unwrap();

        let names: Vec<_> = recipes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["One Pot Pasta", "Chili", "Lentil Soup"]);
        assert_eq!(recipes[0].source_url, format!("{base}/one-pot-pasta/"));
        assert_eq!(recipes[0].total_time_minutes, Some(30));
        assert_eq!(recipes[0].tags, vec!["pasta", "dinner"]);

        feb_mock.assert_async().await;
        jan_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_future_end_is_clamped_to_current_month() {
        let mut server = Server::new_async().await;
        let base = server.url();

        let march = server
            .mock("GET", "/archive/2024/3")
            .with_status(200)
            .with_body(budgetbytes_archive(&[format!("{base}/pancakes/")]))
            .create_async()
            .await;
        let future = server
            .mock("GET", Matcher::Regex(r"^/archive/(2024/([4-9]|1[0-2])|2025/\d+)$".to_string()))
            .expect(0)
            .create_async()
            .await;
        server
            .mock("GET", "/pancakes/")
            .with_status(200)
            .with_body(budgetbytes_recipe("Pancakes", 20))
            .create_async()
            .await;

        let harvester = http_harvester();
        let source = harvester.budget_bytes().with_base_url(base);
        let range = DateRange::new(2024, 3, 2025, 6).unwrap();
        let recipes = harvester.harvest_range(&source, 5, range).await.unwrap();

        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].name, "Pancakes");
        march.assert_async().await;
        future.assert_async().await;
    }

    #[tokio::test]
    async fn test_range_before_archive_makes_no_requests() {
        let mut server = Server::new_async().await;
        let any = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let harvester = http_harvester();
        let source = harvester.budget_bytes().with_base_url(server.url());
        let range = DateRange::new(2009, 4, 2009, 8).unwrap();
        let result = harvester.harvest_range(&source, 5, range).await;

        match result {
            Err(HarvestError::InvalidDateRange(message)) => assert!(message.contains("too early")),
            other => panic!("expected an invalid range, got {:?}", other.map(|r| r.len())),
        }
        any.assert_async().await;
    }

    #[tokio::test]
    async fn test_range_starting_in_future_is_rejected() {
        let mut server = Server::new_async().await;
        let any = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let harvester = http_harvester();
        let source = harvester.budget_bytes().with_base_url(server.url());
        let range = DateRange::new(2024, 5, 2024, 6).unwrap();
        let result = harvester.harvest_range(&source, 5, range).await;

        assert!(matches!(result, Err(HarvestError::InvalidDateRange(_))));
        any.assert_async().await;
    }

    #[tokio::test]
    async fn test_failing_detail_is_dropped() {
        let mut server = Server::new_async().await;
        let base = server.url();

        let links = vec![format!("{base}/good/"), format!("{base}/broken/")];
        server
            .mock("GET", "/archive/2024/3")
            .with_status(200)
            .with_body(budgetbytes_archive(&links))
            .create_async()
            .await;
        server
            .mock("GET", "/good/")
            .with_status(200)
            .with_body(budgetbytes_recipe("Good Soup", 25))
            .create_async()
            .await;
        server
            .mock("GET", "/broken/")
            .with_status(500)
            .create_async()
            .await;

        let harvester = http_harvester();
        let source = harvester.budget_bytes().with_base_url(base.clone());
        let range = DateRange::new(2024, 3, 2024, 3).unwrap();
        let recipes = harvester.harvest_range(&source, 5, range).await.unwrap();

        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].source_url, format!("{base}/good/"));
    }

    #[tokio::test]
    async fn test_discovery_stops_once_enough_links_are_found() {
        let base = "https://bb.test";
        let links: Vec<String> = (0..12).map(|n| format!("{base}/recipe-{n}/")).collect();

        let fetcher = Arc::new(
            FixtureFetcher::new()
                .with_page(format!("{base}/archive/2024/3"), budgetbytes_archive(&links))
                .with_page(links[0].clone(), budgetbytes_recipe("First", 10))
                .with_page(links[1].clone(), budgetbytes_recipe("Second", 15)),
        );
        let harvester = fixture_harvester(fetcher.clone());
        let source = BudgetBytes::new(harvester.context().clone()).with_base_url(base);

        let recipes = harvester.harvest(&source, 2).await;
        let names: Vec<_> = recipes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);

        // One batch of months covers the twelve links needed.
        let archive_requests = fetcher
            .requested()
            .iter()
            .filter(|url| url.contains("/archive/"))
            .count();
        assert_eq!(archive_requests, 4);
        assert_eq!(source.name(), "budgetbytes");
    }
}
