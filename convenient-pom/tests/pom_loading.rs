use convenient_pom::{PomError, Project};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn load_uses_descriptor_directory_as_basedir() {
    let temp = TempDir::new().unwrap();
    let pom = temp.path().join("pom.xml");
    fs::write(
        &pom,
        r#"<project>
  <artifactId>service</artifactId>
  <build>
    <plugins>
      <plugin><artifactId>maven-surefire-plugin</artifactId></plugin>
    </plugins>
  </build>
</project>"#,
    )
    .unwrap();

    let project = Project::load(&pom).unwrap();
    assert_eq!(project.basedir, temp.path());
    assert_eq!(project.build_directory, temp.path().join("target"));
    assert_eq!(project.output_directory, temp.path().join("target").join("classes"));
    assert!(project.has_plugin("maven-surefire-plugin"));
}

#[test]
fn missing_descriptor_reports_path() {
    let temp = TempDir::new().unwrap();
    let pom = temp.path().join("pom.xml");

    let err = Project::load(&pom).unwrap_err();
    assert!(matches!(err, PomError::Io { ref path, .. } if *path == pom));
    assert!(err.to_string().contains("pom.xml"));
}

#[test]
fn truncated_descriptor_is_an_error() {
    let temp = TempDir::new().unwrap();
    let pom = temp.path().join("pom.xml");
    fs::write(&pom, "<project><build>").unwrap();

    assert!(matches!(
        Project::load(&pom),
        Err(PomError::UnexpectedEof(_) | PomError::Xml(_))
    ));
}

#[test]
fn bad_build_directory_expression_fails_loading() {
    let temp = TempDir::new().unwrap();
    let pom = temp.path().join("pom.xml");
    fs::write(&pom, "<project><build><directory>${missing}</directory></build></project>").unwrap();

    assert!(matches!(Project::load(&pom), Err(PomError::Interpolation(_))));
}

#[test]
fn relative_descriptor_path_has_current_dir_basedir() {
    let project = Project::parse("<project/>", PathBuf::from(".")).unwrap();
    assert_eq!(project.output_directory, PathBuf::from("./target/classes"));
}
