//! 부팅 진행 상황 출력
//!
//! 레지스트리 초기화와 서버 기동 단계를 로그로 남깁니다.
//! `env_logger` 포맷을 그대로 따르도록 `println!` 대신 `log` 매크로를 사용합니다.

const BOX_WIDTH: usize = 50;

pub fn print_boxed_title(title: &str) {
    let border = "═".repeat(BOX_WIDTH);
    log::info!("╔{}╗", border);
    log::info!("║{:^width$}║", title, width = BOX_WIDTH - 1);
    log::info!("╚{}╝", border);
}

pub fn print_step_start(step: u8, description: &str) {
    log::info!("→ Step {}: {}", step, description);
}

pub fn print_step_complete(step: u8, description: &str, count: usize) {
    log::info!("✓ Step {}: {} ({} items)", step, description, count);
}

pub fn print_sub_task(name: &str, status: &str) {
    log::debug!("   ├─ {}: {}", name, status);
}

pub fn print_final_summary(repos: usize, services: usize) {
    print_boxed_title("🎉 SERVICE REGISTRY INITIALIZED");
    log::info!("   📦 Repositories: {} / 🔧 Services: {}", repos, services);
}

pub fn print_cache_initialized(cache_type: &str, count: usize) {
    log::debug!("   ├─ {} cache: {} entries", cache_type, count);
}

/// 서버 기동 배너
pub fn print_server_banner(address: &str, environment: &str, docs_path: &str) {
    print_boxed_title("🍽  RESTAURANT AUTH BACKEND");
    log::info!("   🌐 Listening on http://{}", address);
    log::info!("   🏷  Environment: {}", environment);
    log::info!("   📚 API docs: http://{}{}", address, docs_path);
}
