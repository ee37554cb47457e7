//! Shared fixtures and stub strategies for the integration suite
//!
//! The HTML here mirrors the markup the catalog service scrapes, trimmed to
//! the elements the selectors actually touch.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use otakuscrape::error::{FailureKind, FetchError};
use otakuscrape::fetch::{FetchRequest, FetchResult, FetchStrategy, StrategyKind};

/// Strategy that answers from a canned outcome and counts its calls.
pub struct StubStrategy {
    kind: StrategyKind,
    outcome: Result<String, (FailureKind, String)>,
    calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl StubStrategy {
    pub fn serving(kind: StrategyKind, body: &str) -> Self {
        Self {
            kind,
            outcome: Ok(body.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(kind: StrategyKind, failure: FailureKind, message: &str) -> Self {
        Self {
            kind,
            outcome: Err((failure, message.to_string())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handle on the call counter; take it before boxing the strategy away.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait::async_trait]
impl FetchStrategy for StubStrategy {
    fn kind(&self) -> StrategyKind {
        self.kind
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResult, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(html) => Ok(FetchResult {
                html: html.clone(),
                final_url: request.url.clone(),
                strategy: self.kind,
            }),
            Err((failure, message)) => {
                Err(FetchError::new(self.kind, failure.clone(), message.clone()))
            }
        }
    }
}

/// Ongoing listing with two series and a pagination nav.
#[allow(dead_code)]
pub fn ongoing_page() -> String {
    r#"<!DOCTYPE html>
<html><body>
<div class="venz"><ul>
  <li>
    <div class="thumb">
      <a href="https://otakudesu.best/anime/spy-x-family/">
        <div class="thumbz">
          <img src="https://img.otakudesu.best/spy.jpg" alt="">
          <h2 class="jdlflm">Spy x Family</h2>
        </div>
      </a>
    </div>
    <div class="epz">Episode 8</div>
    <div class="epztipe"> Sabtu </div>
  </li>
  <li>
    <div class="thumb">
      <a href="https://otakudesu.best/anime/kimetsu-yaiba/">
        <div class="thumbz">
          <img src="https://img.otakudesu.best/kimetsu.jpg" alt="">
          <h2 class="jdlflm">Kimetsu no Yaiba</h2>
        </div>
      </a>
    </div>
    <div class="epz">Episode 5</div>
    <div class="epztipe"> Minggu </div>
  </li>
</ul></div>
<div class="pagenavix">
  <span class="page-numbers current">1</span>
  <a class="page-numbers" href="/ongoing-anime/page/2/">2</a>
  <a class="page-numbers" href="/ongoing-anime/page/24/">24</a>
  <a class="next page-numbers" href="/ongoing-anime/page/2/">Berikutnya</a>
</div>
</body></html>"#
        .to_string()
}

/// Search results with two hits.
#[allow(dead_code)]
pub fn search_page() -> String {
    r#"<!DOCTYPE html>
<html><body>
<ul class="chivsrc">
  <li>
    <img src="https://img.otakudesu.best/naruto.jpg" alt="">
    <h2><a href="https://otakudesu.best/anime/naruto-sub-indo/">Naruto Subtitle Indonesia</a></h2>
    <div class="set"><b>Genres</b> : <a href="/genres/action/">Action</a>, <a href="/genres/adventure/">Adventure</a></div>
    <div class="set"><b>Status</b> : Completed</div>
    <div class="set"><b>Rating</b> : 8.21</div>
  </li>
  <li>
    <img src="https://img.otakudesu.best/boruto.jpg" alt="">
    <h2><a href="https://otakudesu.best/anime/boruto-sub-indo/">Boruto Subtitle Indonesia</a></h2>
    <div class="set"><b>Genres</b> : <a href="/genres/action/">Action</a></div>
    <div class="set"><b>Status</b> : Ongoing</div>
    <div class="set"><b>Rating</b> : 7.05</div>
  </li>
</ul>
</body></html>"#
        .to_string()
}

/// Series detail page with metadata and three episodes, newest first.
#[allow(dead_code)]
pub fn detail_page() -> String {
    r#"<!DOCTYPE html>
<html><body>
<div class="venser">
  <div class="jdlrx"><h1>Spy x Family Subtitle Indonesia</h1></div>
  <div class="fotoanime"><img src="https://img.otakudesu.best/spy-detail.jpg" alt=""></div>
  <div class="infozingle">
    <p><span><b>Status</b> : Ongoing</span></p>
    <p><span><b>Type</b> : TV</span></p>
    <p><span><b>Total Episode</b> : 12</span></p>
    <p><span><b>Aired</b> : Apr 09, 2022</span></p>
    <p><span><b>Genres</b> : Action, Comedy, Shounen</span></p>
    <p><span><b>Score</b> : 8.61</span></p>
  </div>
  <div class="sinopc"><p>A spy builds a pretend family for his mission.</p></div>
  <div class="episodelist"><ul>
    <li>
      <span class="leftoff">Episode 3</span>
      <span class="lefttitle"><a href="https://otakudesu.best/episode/spy-x-family-episode-3/">Spy x Family Episode 3</a></span>
      <span class="zeebr">23 April 2022</span>
    </li>
    <li>
      <span class="leftoff">Episode 2</span>
      <span class="lefttitle"><a href="https://otakudesu.best/episode/spy-x-family-episode-2/">Spy x Family Episode 2</a></span>
      <span class="zeebr">16 April 2022</span>
    </li>
    <li>
      <span class="leftoff">Episode 1</span>
      <span class="lefttitle"><a href="https://otakudesu.best/episode/spy-x-family-episode-1/">Spy x Family Episode 1</a></span>
      <span class="zeebr">09 April 2022</span>
    </li>
  </ul></div>
</div>
</body></html>"#
        .to_string()
}

/// Episode page carrying one unrelated frame and one streaming embed.
#[allow(dead_code)]
pub fn episode_page() -> String {
    r#"<!DOCTYPE html>
<html><body>
<div id="venkonten">
  <iframe src="https://www.youtube.com/embed/trailer"></iframe>
  <div id="pembed"><iframe src="https://desustream.info/beta/stream/?id=abc123"></iframe></div>
</div>
</body></html>"#
        .to_string()
}
