//! Stylesheet shared by every page of a package.
//!
//! Self-contained: no web fonts, images or remote imports, so packages
//! render the same offline.

pub const STYLESHEET_CSS: &str = r#"/* SCORM package styles */
* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Ubuntu, sans-serif;
  line-height: 1.6;
  color: #2d3142;
  background: linear-gradient(135deg, #4f6bd8 0%, #6a4c9c 100%);
  min-height: 100vh;
}

.container {
  max-width: 900px;
  min-height: 100vh;
  margin: 0 auto;
  padding: 2rem;
  background: #fff;
  box-shadow: 0 0 40px rgba(0, 0, 0, 0.1);
}

.header {
  text-align: center;
  padding: 2rem 0;
  margin-bottom: 2rem;
  border-bottom: 2px solid #eef0f4;
}

.header h1 {
  font-size: 2rem;
  color: #1b1e2b;
  margin-bottom: 0.5rem;
}

.description,
.breadcrumb,
.progress-text,
.progress-info {
  color: #666;
}

.breadcrumb {
  font-size: 0.9rem;
  margin-bottom: 1rem;
}

.breadcrumb a {
  color: #4f6bd8;
  text-decoration: none;
}

.content {
  padding: 1rem 0;
}

.content h2 {
  margin-bottom: 1rem;
}

.modules-list {
  display: flex;
  flex-direction: column;
  gap: 1rem;
}

.module-card {
  display: flex;
  align-items: center;
  padding: 1.5rem;
  background: #f7f8fa;
  border: 2px solid transparent;
  border-radius: 12px;
  color: inherit;
  text-decoration: none;
  transition: all 0.3s ease;
}

.module-card:hover {
  border-color: #4f6bd8;
  transform: translateX(5px);
}

.module-number {
  display: flex;
  align-items: center;
  justify-content: center;
  width: 40px;
  height: 40px;
  margin-right: 1rem;
  border-radius: 50%;
  background: #4f6bd8;
  color: #fff;
  font-weight: bold;
}

.module-info {
  flex: 1;
}

.module-duration {
  font-size: 0.85rem;
  color: #888;
}

.module-arrow {
  font-size: 1.5rem;
  color: #4f6bd8;
}

.duration-badge {
  display: inline-block;
  margin-top: 0.5rem;
  padding: 0.25rem 0.75rem;
  border-radius: 20px;
  background: #e8f0fd;
  color: #2a5bc7;
  font-size: 0.85rem;
}

.module-content {
  min-height: 300px;
  margin: 1rem 0;
  padding: 2rem;
  border-radius: 12px;
  background: #fafbfc;
}

.module-content p,
.module-content ul,
.module-content ol {
  margin-bottom: 1rem;
}

.module-content ul,
.module-content ol {
  padding-left: 1.5rem;
}

.placeholder-content {
  text-align: center;
  padding: 3rem;
  color: #666;
}

.index-actions,
.navigation {
  display: flex;
  justify-content: space-between;
  gap: 1rem;
  margin-top: 2rem;
}

.navigation {
  padding: 1.5rem 0;
  border-top: 2px solid #eef0f4;
}

.nav-btn {
  padding: 0.75rem 1.5rem;
  border: none;
  border-radius: 8px;
  font-size: 1rem;
  font-weight: 500;
  text-decoration: none;
  cursor: pointer;
  transition: all 0.3s ease;
}

.nav-btn.prev {
  background: #eef0f4;
  color: #2d3142;
}

.nav-btn.next,
.nav-btn.complete,
.nav-btn.resume,
.nav-btn.quiz-link,
.submit-btn {
  background: #4f6bd8;
  color: #fff;
}

.nav-btn:hover:not(.disabled) {
  transform: translateY(-2px);
}

.nav-btn.disabled {
  background: #e0e0e0;
  color: #999;
  cursor: not-allowed;
}

.footer {
  text-align: center;
  margin-top: 2rem;
  padding: 1.5rem 0;
  border-top: 2px solid #eef0f4;
}

.progress-bar {
  width: 100%;
  height: 8px;
  margin-bottom: 0.5rem;
  overflow: hidden;
  border-radius: 4px;
  background: #e0e0e0;
}

.progress-fill {
  height: 100%;
  background: #4f6bd8;
  transition: width 0.5s ease;
}

.progress-info {
  display: flex;
  justify-content: space-between;
  font-size: 0.9rem;
}

.question {
  margin-bottom: 1.5rem;
  padding: 1.5rem;
  border-radius: 12px;
  background: #f7f8fa;
}

.question h3 {
  color: #4f6bd8;
  margin-bottom: 0.5rem;
}

.question-text {
  font-size: 1.1rem;
  margin-bottom: 1rem;
}

.answers {
  display: flex;
  flex-direction: column;
  gap: 0.75rem;
}

.answer-option {
  display: flex;
  align-items: center;
  padding: 1rem;
  border: 2px solid transparent;
  border-radius: 8px;
  background: #fff;
  cursor: pointer;
}

.answer-option:hover {
  border-color: #4f6bd8;
}

.answer-option input {
  margin-right: 1rem;
}

.submit-btn {
  display: block;
  width: 100%;
  margin-top: 2rem;
  padding: 1rem;
  border: none;
  border-radius: 8px;
  font-size: 1.1rem;
  font-weight: 600;
  cursor: pointer;
}

.results {
  text-align: center;
  padding: 3rem;
}

.score-display {
  margin: 1.5rem 0;
  font-size: 3rem;
  font-weight: bold;
  color: #4f6bd8;
}

.hidden {
  display: none;
}

@media (max-width: 768px) {
  .container {
    padding: 1rem;
  }

  .header h1 {
    font-size: 1.5rem;
  }

  .index-actions,
  .navigation {
    flex-direction: column;
  }

  .nav-btn {
    width: 100%;
    text-align: center;
  }
}
"#;
