//! HTML-страницы сервиса.
//!
//! Чистые функции `(сообщения, данные) -> разметка`, без состояния. Всё, что
//! приходит от пользователя или из базы, проходит через [`escape_html`].

use std::fmt::Write;

use crate::models::SeatRecord;

const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css";
const BOOTSTRAP_JS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/js/bootstrap.bundle.min.js";

/// Уровень сообщения, определяет цвет bootstrap-алерта
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Danger,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn warning(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, text: text.into() }
    }

    pub fn danger(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Danger, text: text.into() }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, text: text.into() }
    }

    fn render(&self) -> String {
        let class = match self.level {
            NoticeLevel::Warning => "alert alert-warning small",
            NoticeLevel::Danger => "alert alert-danger",
            NoticeLevel::Success => "alert alert-success",
        };
        format!(r#"<div class="{}">{}</div>"#, class, escape_html(&self.text))
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str, scripts: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <link href="{css}" rel="stylesheet">
</head>
<body>
  <div class="container mt-5">
    <div class="row justify-content-center">
{body}
    </div>
  </div>
  <script src="{js}"></script>
{scripts}
</body>
</html>
"#,
        title = escape_html(title),
        css = BOOTSTRAP_CSS,
        js = BOOTSTRAP_JS,
        body = body,
        scripts = scripts,
    )
}

fn results_table(results: &[SeatRecord]) -> String {
    if results.is_empty() {
        return String::new();
    }

    let mut rows = String::new();
    for record in results {
        let _ = write!(
            rows,
            "\n              <tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&record.name_en),
            escape_html(&record.name_zh),
            escape_html(&record.seat),
        );
    }

    format!(
        r#"
          <div class="pt-4 border-top">
            <h3>Search Results:</h3>
            <div class="table-responsive">
              <table class="table table-striped">
                <thead>
                  <tr><th>Name</th><th>姓名</th><th>Seat</th></tr>
                </thead>
                <tbody>{rows}
                </tbody>
              </table>
            </div>
          </div>"#
    )
}

/// Главная страница: форма поиска, сообщения и таблица результатов
pub fn search_page(notices: &[Notice], results: &[SeatRecord], key: &str) -> String {
    let title = if key.is_empty() {
        "Seat Search".to_string()
    } else {
        format!("Seat Search: {}", key)
    };
    let alerts: String = notices.iter().map(Notice::render).collect();

    let body = format!(
        r#"      <div class="col mx-auto" style="max-width: 36rem;">
        <div class="card shadow-lg">
          <div class="card-header mt-5">
            <h2 class="text-center mb-0">Find My Seat</h2>
          </div>
          <div class="card-body">
            {alerts}
            <form method="GET" action="/" class="mb-4">
              <div class="mb-3">
                <input type="text" class="form-control form-control-lg" id="name" name="name" value="{key}" required
                       placeholder="Enter name to search...">
              </div>
              <button type="submit" class="btn btn-primary btn-lg w-100">Find</button>
            </form>
            {table}
          </div>
        </div>
      </div>"#,
        alerts = alerts,
        key = escape_html(key),
        table = results_table(results),
    );

    page(&title, &body, "")
}

/// Форма входа в админку; пароль уходит POST-ом на тот же путь
pub fn admin_login_page(notice: Option<&Notice>) -> String {
    let alert = notice.map(Notice::render).unwrap_or_default();

    let body = format!(
        r#"      <div class="col-md-6">
        <div class="card shadow-lg">
          <div class="card-header mt-3">
            <h2 class="text-center mb-0">Admin Access</h2>
          </div>
          <div class="card-body mb-3">
            {alert}
            <form method="POST">
              <div class="mb-3">
                <label for="password" class="form-label">Password:</label>
                <input type="password" class="form-control form-control-lg" id="password" name="password" required>
              </div>
              <button type="submit" class="btn btn-primary btn-lg w-100">Login</button>
            </form>
          </div>
        </div>
      </div>"#
    );

    page("Admin Login", &body, "")
}

const UPLOAD_SCRIPT: &str = r#"  <script>
    document.getElementById('uploadButton').addEventListener('click', function () {
      const csvFileInput = document.getElementById('csvfile');
      const form = document.getElementById('uploadForm');
      if (!csvFileInput.files || csvFileInput.files.length === 0) {
        csvFileInput.classList.add('is-invalid');
        form.classList.add('was-validated');
        return;
      }
      csvFileInput.classList.remove('is-invalid');
      csvFileInput.classList.add('is-valid');
      new bootstrap.Modal(document.getElementById('confirmModal')).show();
    });

    document.getElementById('confirmUpload').addEventListener('click', function () {
      const passwordInput = document.getElementById('confirmPassword');
      if (!passwordInput.value) {
        passwordInput.classList.add('is-invalid');
        return;
      }
      passwordInput.classList.remove('is-invalid');
      const hidden = document.createElement('input');
      hidden.type = 'hidden';
      hidden.name = 'password';
      hidden.value = passwordInput.value;
      const form = document.getElementById('uploadForm');
      form.appendChild(hidden);
      form.submit();
    });
  </script>"#;

/// Форма загрузки CSV. Пароль в разметку не попадает, его заново
/// спрашивает модальное окно подтверждения.
pub fn admin_upload_page(notice: Option<&Notice>, admin_path: &str) -> String {
    let alert = notice.map(Notice::render).unwrap_or_default();

    let body = format!(
        r#"      <div class="col-md-8">
        <div class="card shadow-lg">
          <div class="card-header mt-3">
            <h2 class="text-center mb-0">Upload Data</h2>
          </div>
          <div class="card-body mb-3">
            {alert}
            <div class="alert alert-info">
              <strong>CSV Format Requirements:</strong>
              <ul class="mb-0">
                <li>Must include columns: <code>name_en</code>, <code>name_zh</code>, <code>seat</code></li>
                <li>First row should be headers</li>
                <li>File size <code>≤ 3MB</code> (roughly 20,000 lines)</li>
                <li>Additional columns will be ignored</li>
                <li>This will replace all existing data</li>
              </ul>
            </div>
            <form id="uploadForm" method="POST" action="{action}" enctype="multipart/form-data" novalidate>
              <div class="mb-3">
                <label for="csvfile" class="form-label">CSV File:</label>
                <input type="file" class="form-control form-control-lg" id="csvfile" name="csvfile" accept=".csv" required>
                <div class="invalid-feedback">Please select a CSV file.</div>
              </div>
              <button type="button" class="btn btn-danger btn-lg w-100" id="uploadButton">Upload and Replace Data</button>
            </form>
            <div class="mt-3">
              <a href="/" class="btn btn-link">Back to Search</a>
            </div>
          </div>
        </div>
      </div>
      <div class="modal fade" id="confirmModal" tabindex="-1" aria-labelledby="confirmModalLabel" aria-hidden="true">
        <div class="modal-dialog">
          <div class="modal-content">
            <div class="modal-header">
              <h5 class="modal-title" id="confirmModalLabel">Confirm Data Replacement</h5>
              <button type="button" class="btn-close" data-bs-dismiss="modal" aria-label="Close"></button>
            </div>
            <div class="modal-body">
              <div class="alert alert-warning">
                <strong>Warning:</strong> This action will permanently delete all existing data and replace it with the uploaded CSV file.
              </div>
              <div class="mb-3">
                <label for="confirmPassword" class="form-label">Enter password to confirm:</label>
                <input type="password" class="form-control" id="confirmPassword" required>
                <div class="invalid-feedback">Please enter the password.</div>
              </div>
            </div>
            <div class="modal-footer">
              <button type="button" class="btn btn-secondary" data-bs-dismiss="modal">Cancel</button>
              <button type="button" class="btn btn-danger" id="confirmUpload">Confirm Upload</button>
            </div>
          </div>
        </div>
      </div>"#,
        alert = alert,
        action = escape_html(admin_path),
    );

    page("Admin Upload", &body, UPLOAD_SCRIPT)
}
