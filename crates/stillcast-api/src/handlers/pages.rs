//! Upload form page.

use axum::response::Html;

/// The only HTML in the system; everything else is an API surface.
const UPLOAD_FORM: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Stillcast</title>
</head>
<body>
  <h1>Create a video from an image and an audio track</h1>
  <form action="/" method="post" enctype="multipart/form-data">
    <p><label>Image: <input type="file" name="image" accept="image/*" required></label></p>
    <p><label>Audio: <input type="file" name="audio" accept="audio/*" required></label></p>
    <p><label>Resolution:
      <select name="resolution">
        <option value="720p" selected>720p</option>
        <option value="1080p">1080p</option>
      </select>
    </label></p>
    <p><button type="submit">Create video</button></p>
  </form>
</body>
</html>
"#;

/// Serve the upload form.
pub async fn upload_form() -> Html<&'static str> {
    Html(UPLOAD_FORM)
}
