use std::fs;
use std::path::Path;

pub const DOCKERFILE: &str = "FROM node:latest\nADD . /app\nRUN npm ci\n";

pub const MANIFEST: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
spec:
  template:
    spec:
      containers:
        - name: web
          image: nginx
"#;

pub const COMPOSE: &str = r#"services:
  web:
    image: nginx:latest
    privileged: true
"#;

pub const CLEAN_DOCKERFILE: &str =
    "FROM node:20-alpine\nUSER node\nHEALTHCHECK CMD node healthcheck.js\nCMD [\"node\", \"server.js\"]\n";

/// A project with one Dockerfile, one manifest and one compose file, all non-compliant.
pub fn create_noncompliant_project(root: &Path) {
    fs::write(root.join("Dockerfile"), DOCKERFILE).unwrap();
    fs::create_dir_all(root.join("deploy")).unwrap();
    fs::write(root.join("deploy").join("app.yaml"), MANIFEST).unwrap();
    fs::write(root.join("docker-compose.yml"), COMPOSE).unwrap();
    fs::write(root.join("README.md"), "# shop\n").unwrap();
}

#[allow(dead_code)]
pub fn create_clean_project(root: &Path) {
    fs::write(root.join("Dockerfile"), CLEAN_DOCKERFILE).unwrap();
}
