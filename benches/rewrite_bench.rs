use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use proxynet::cookies::psl::PublicSuffixList;
use proxynet::http::ChunkTransform;
use proxynet::rewrite::{LinkRewriter, MetaRobotsInjector};
use proxynet::ProxyConfig;
use std::sync::Arc;
use url::Url;

fn html_chunk() -> Bytes {
    let mut html = String::from("<html><head><title>bench</title></head><body>");
    for i in 0..200 {
        html.push_str(&format!(
            "<a href=\"/proxy/https://www.site.com/p/{0}\">same</a>\
             <a href=\"/proxy/https://cdn.site.com/a/{0}.js\">cross</a>\
             <a href=\"/proxy/https://other.org/{0}\">other</a>",
            i
        ));
    }
    html.push_str("</body></html>");
    Bytes::from(html)
}

fn bench_link_rewrite(c: &mut Criterion) {
    let chunk = html_chunk();
    let page = Url::parse("https://www.site.com/").unwrap();
    let config = ProxyConfig::default();

    let mut group = c.benchmark_group("body_transforms");

    group.bench_function("link_rewrite_16k_chunk", |b| {
        b.iter(|| {
            let mut rewriter = LinkRewriter::for_page(&config, &page, Arc::new(PublicSuffixList))
                .unwrap()
                .unwrap();
            black_box(rewriter.transform(black_box(chunk.clone())));
        });
    });

    group.bench_function("meta_robots_16k_chunk", |b| {
        b.iter(|| {
            let mut injector = MetaRobotsInjector::new();
            black_box(injector.transform(black_box(chunk.clone())));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_link_rewrite);
criterion_main!(benches);
