use crate::models::AnimationSet;

pub const TITLE: &str = "GEN Vision AI Assistant";
pub const SUBTITLE: &str = "See the better future with GEN-Vision";
pub const LOADING_FALLBACK: &str = "Generating response...";
pub const LOADING_CAPTION: &str = "Ideas Catching Fire... 🔥";

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{TITLE}}</title>
<script src="https://cdnjs.cloudflare.com/ajax/libs/lottie-web/5.12.2/lottie.min.js"></script>
<style>
  body { font-family: sans-serif; max-width: 760px; margin: 2rem auto; padding: 0 1rem; }
  #background { position: fixed; inset: 0; z-index: -1; opacity: 0.3; overflow: hidden; pointer-events: none; }
  input[type=text] { width: 100%; height: 60px; font-size: 18px; padding: 8px; border-radius: 8px; box-sizing: border-box; }
  input[type=file]::file-selector-button, button {
    background-color: #3CE37C; color: white; border: none; border-radius: 8px;
    padding: 0.5em 1em; font-weight: bold; cursor: pointer;
  }
  input[type=file]::file-selector-button:hover { background-color: #732d91; }
  button:hover { background-color: #E501FF; }
  #preview { max-width: 100%; margin-top: 1rem; }
  #loading { text-align: center; }
  .anim-small { width: 100px; height: 100px; margin: 0 auto; }
  .result { background-color: #f0f0f0; padding: 15px; border-radius: 10px; font-size: 16px; }
  .error { background-color: #fde8e8; color: #8a1c1c; padding: 15px; border-radius: 10px; }
</style>
</head>
<body>
<div id="background"></div>
<h1>{{TITLE}}</h1>
<h3>{{SUBTITLE}}</h3>
<div id="coding" class="anim-small"></div>
<div id="intro"></div>

<form id="ask">
  <label for="prompt">Input prompt:</label>
  <input type="text" id="prompt" name="prompt">
  <p><label for="image">Choose an image...</label>
  <input type="file" id="image" accept=".jpg,.jpeg,.png"></p>
  <img id="preview" alt="Uploaded image" hidden>
  <p><button type="submit">Submit</button></p>
</form>

<div id="loading" hidden>
  <div id="spinner" class="anim-small"></div>
  <h5 id="loading-text"></h5>
</div>
<div id="output" hidden>
  <h2>The Response is:</h2>
  <div id="result"></div>
</div>

<script id="animations" type="application/json">{{ANIMATIONS}}</script>
<script>
const animations = JSON.parse(document.getElementById("animations").textContent);
const hasSpinner = {{HAS_SPINNER}};

function play(id, data, speed) {
  if (!data || !window.lottie) return;
  const anim = lottie.loadAnimation({
    container: document.getElementById(id), renderer: "svg", loop: true, autoplay: true, animationData: data
  });
  anim.setSpeed(speed);
}
play("background", animations.background, 1);
play("coding", animations.coding, 0.1);
play("intro", animations.intro, 1);

function readImage(file) {
  return new Promise((resolve, reject) => {
    const reader = new FileReader();
    reader.onload = () => resolve({ filename: file.name, data: reader.result });
    reader.onerror = () => reject(reader.error);
    reader.readAsDataURL(file);
  });
}

const fileInput = document.getElementById("image");
fileInput.addEventListener("change", async () => {
  const preview = document.getElementById("preview");
  if (!fileInput.files.length) { preview.hidden = true; return; }
  preview.src = (await readImage(fileInput.files[0])).data;
  preview.hidden = false;
});

document.getElementById("ask").addEventListener("submit", async (event) => {
  event.preventDefault();
  const loading = document.getElementById("loading");
  const spinner = document.getElementById("spinner");
  const output = document.getElementById("output");
  const result = document.getElementById("result");

  spinner.innerHTML = "";
  if (hasSpinner) {
    play("spinner", animations.spinner, 0.1);
    document.getElementById("loading-text").textContent = "{{LOADING_CAPTION}}";
  } else {
    document.getElementById("loading-text").textContent = "{{LOADING_FALLBACK}}";
  }
  output.hidden = true;
  loading.hidden = false;

  const body = { prompt: document.getElementById("prompt").value };
  if (fileInput.files.length) body.image = await readImage(fileInput.files[0]);

  try {
    const response = await fetch("/api/generate", {
      method: "POST", headers: { "Content-Type": "application/json" }, body: JSON.stringify(body)
    });
    const outcome = await response.json();
    if (outcome.status === "success") {
      result.className = "result";
      // Answers often carry markup; it is rendered as HTML on purpose.
      result.innerHTML = outcome.text;
    } else {
      result.className = "error";
      result.textContent = outcome.error;
    }
  } catch (err) {
    result.className = "error";
    result.textContent = String(err);
  }
  loading.hidden = true;
  output.hidden = false;
});
</script>
</body>
</html>
"##;

pub fn render(animations: &AnimationSet) -> String {
    let payload = serde_json::to_string(animations).unwrap_or_else(|_| "{}".to_string());
    TEMPLATE
        .replace("{{TITLE}}", TITLE)
        .replace("{{SUBTITLE}}", SUBTITLE)
        .replace("{{LOADING_CAPTION}}", LOADING_CAPTION)
        .replace("{{LOADING_FALLBACK}}", LOADING_FALLBACK)
        .replace("{{HAS_SPINNER}}", if animations.has_spinner() { "true" } else { "false" })
        .replace("{{ANIMATIONS}}", &escape_script(&payload))
}

/// Keeps JSON from closing the surrounding `<script>` element.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_form_and_fallback() {
        let html = render(&AnimationSet::default());
        assert!(html.contains("<h1>GEN Vision AI Assistant</h1>"));
        assert!(html.contains(r#"accept=".jpg,.jpeg,.png""#));
        assert!(html.contains("const hasSpinner = false;"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_answers_render_as_markup_and_errors_as_text() {
        let html = render(&AnimationSet::default());
        assert!(html.contains("result.innerHTML = outcome.text;"));
        assert!(html.contains("result.textContent = outcome.error;"));
        assert!(!html.contains("innerHTML = outcome.error"));
    }

    #[test]
    fn test_render_embeds_animations_safely() {
        let set = AnimationSet {
            spinner: Some(json!({"nm": "</script><b>"})),
            ..Default::default()
        };
        let html = render(&set);
        assert!(html.contains("const hasSpinner = true;"));
        assert!(html.contains(r#"<\/script><b>"#));
        assert_eq!(html.matches("</script>").count(), 3);
    }
}
