use std::borrow::Cow;

use tera::{Context, Tera};

use crate::{fs::read_file, *};

pub(crate) mod tera_filters;
use tera_filters::yaml_str;

/// Renders the composed documents with the artifact templates.
#[derive(Debug)]
pub struct Renderer {
	tera: Tera,
}

impl Renderer {
	/// Loads the built-in templates. A template with the same name in `templates_dir` replaces the built-in one.
	pub fn new(templates_dir: Option<&Path>) -> AppResult<Self> {
		let mut tera = Tera::default();

		tera.autoescape_on(vec![]);

		tera.register_filter("yaml_str", yaml_str);

		for kind in ArtifactKind::ALL {
			let name = kind.template_name();

			let custom_template = templates_dir
				.map(|dir| dir.join(name))
				.filter(|path| path.is_file());

			let content: Cow<'static, str> = if let Some(path) = custom_template {
				debug!("Using the custom template `{}` for the {kind}", path.display());

				Cow::Owned(read_file(&path)?)
			} else {
				Cow::Borrowed(kind.builtin_template())
			};

			tera.add_raw_template(name, &content)
				.map_err(|e| AppError::TemplateParsing {
					template: name.to_string(),
					source: e,
				})?;
		}

		Ok(Self { tera })
	}

	/// Renders a document with the template for its artifact kind. The output is not normalized.
	pub fn render<T: Serialize>(&self, kind: ArtifactKind, document: &T) -> AppResult<String> {
		let template = kind.template_name();

		let context =
			Context::from_serialize(document).map_err(|e| AppError::TemplateContextParsing {
				template: template.to_string(),
				source: e,
			})?;

		self.tera
			.render(template, &context)
			.map_err(|e| AppError::TemplateRendering {
				template: template.to_string(),
				source: e,
			})
	}
}

#[cfg(test)]
mod tests {
	use indoc::indoc;
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::{
		compose::{compose_pipeline, compose_service, compose_workload},
		resolve::resolve,
	};

	fn render(kind: ArtifactKind, descriptor: &ServiceDescriptor) -> String {
		let renderer = Renderer::new(None).unwrap();
		let resolved = resolve(descriptor);

		let rendered = match kind {
			ArtifactKind::Workload => renderer.render(kind, &compose_workload(&resolved)),
			ArtifactKind::Service => renderer.render(kind, &compose_service(&resolved).unwrap()),
			ArtifactKind::Pipeline => renderer.render(kind, &compose_pipeline(&resolved)),
		};

		normalize(&rendered.unwrap())
	}

	fn shop() -> ServiceDescriptor {
		ServiceDescriptor {
			service_target: Some("true".into()),
			containers: vec![
				ContainerSpec {
					image: Some("nginx:1.27".to_string()),
					env: vec![
						deploy_descriptor::EnvVar::new("MODE", "production"),
						deploy_descriptor::EnvVar::new("ENABLED", true),
					],
					port_number: 80,
					port_name: Some("http".to_string()),
					protocol: "TCP".to_string(),
					probes: vec![ProbeSpec::http()],
					..ContainerSpec::new("web")
				},
				ContainerSpec::new("worker"),
			],
			..ServiceDescriptor::new("shop")
		}
	}

	#[test]
	fn workload_manifest() {
		let expected = indoc! {r#"
			apiVersion: apps/v1
			kind: Deployment
			metadata:
			  labels:
			    app: shop
			  name: shop
			spec:
			  replicas: 2
			  revisionHistoryLimit: 1
			  selector:
			    matchLabels:
			      app: shop
			  strategy:
			    rollingUpdate:
			      maxSurge: 1
			      maxUnavailable: 50%
			    type: RollingUpdate
			  template:
			    metadata:
			      labels:
			        app: shop
			      name: shop
			    spec:
			      containers:
			      - name: web
			        image: nginx:1.27
			        imagePullPolicy: Always
			        env:
			        - name: MODE
			          value: "production"
			        - name: ENABLED
			          value: "true"
			        ports:
			        - containerPort: 80
			          name: http
			          protocol: TCP
			        livenessProbe:
			          failureThreshold: 3
			          httpGet:
			            path: "/"
			            port: 80
			            scheme: HTTP
			          initialDelaySeconds: 30
			          periodSeconds: 30
			          successThreshold: 1
			          timeoutSeconds: 10
			        readinessProbe:
			          failureThreshold: 3
			          initialDelaySeconds: 30
			          periodSeconds: 10
			          successThreshold: 1
			          tcpSocket:
			            port: 80
			          timeoutSeconds: 10
			        resources:
			          limits:
			            cpu: 512m
			            memory: 1024Mi
			          requests:
			            cpu: 200m
			            memory: 256Mi
			        terminationMessagePath: /dev/termination-log
			      - name: worker
			        image: alpine
			        imagePullPolicy: Always
			        resources:
			          limits:
			            cpu: 512m
			            memory: 1024Mi
			          requests:
			            cpu: 200m
			            memory: 256Mi
			        terminationMessagePath: /dev/termination-log
			      dnsPolicy: ClusterFirst
			      restartPolicy: Always
			      securityContext: {}
			      terminationGracePeriodSeconds: 30
		"#};

		assert_eq!(render(ArtifactKind::Workload, &shop()), expected);
	}

	#[test]
	fn local_workload_manifest() {
		let mut descriptor = shop();
		descriptor.local_service = Some("true".into());
		descriptor.replicas = Some("3".into());

		let rendered = render(ArtifactKind::Workload, &descriptor);

		assert!(rendered.contains("  # replicas are fixed to 1 for local services\n  replicas: 1\n"));
		assert!(rendered.contains("        # health checks are omitted for local services\n"));
		assert!(!rendered.contains("livenessProbe"));
		assert!(!rendered.contains("readinessProbe"));
	}

	#[test]
	fn service_manifest() {
		let mut descriptor = shop();
		descriptor.local_service = Some("true".into());

		let expected = indoc! {r#"
			apiVersion: v1
			kind: Service
			metadata:
			  name: shop
			  labels:
			    app: shop
			spec:
			  selector:
			    app: shop
			  type: NodePort
			  ports:
			  - name: web
			    port: 80
			    protocol: TCP
			    targetPort: 80
		"#};

		assert_eq!(render(ArtifactKind::Service, &descriptor), expected);
	}

	#[test]
	fn service_manifest_without_ports() {
		let mut descriptor = shop();
		descriptor.service_target = Some("db".into());

		let rendered = render(ArtifactKind::Service, &descriptor);

		assert!(rendered.contains("  name: shop-db\n"));
		assert!(rendered.ends_with("  ports: []\n"));
	}

	#[test]
	fn pipeline_definition() {
		let expected = indoc! {r#"
			stages:
			  - package
			  - staging
			  - production
			web-package:
			  stage: package
			  image: docker:stable
			  services:
			    - docker:dind
			  script:
			    - docker login -u "$CI_REGISTRY_USER" -p "$CI_REGISTRY_PASSWORD" "$CI_REGISTRY"
			    - docker build -t "$CI_REGISTRY_IMAGE/web:$CI_COMMIT_SHORT_SHA" "web"
			    - docker push "$CI_REGISTRY_IMAGE/web:$CI_COMMIT_SHORT_SHA"
			worker-package:
			  stage: package
			  image: docker:stable
			  services:
			    - docker:dind
			  script:
			    - docker login -u "$CI_REGISTRY_USER" -p "$CI_REGISTRY_PASSWORD" "$CI_REGISTRY"
			    - docker build -t "$CI_REGISTRY_IMAGE/worker:$CI_COMMIT_SHORT_SHA" "worker"
			    - docker push "$CI_REGISTRY_IMAGE/worker:$CI_COMMIT_SHORT_SHA"
			shop-deploy-staging:
			  stage: staging
			  image: bitnami/kubectl:latest
			  environment:
			    name: staging
			  script:
			    - kubectl apply -f "staging/"
			    - kubectl rollout status "deployment/shop"
			  rules:
			    - if: $CI_COMMIT_BRANCH == $CI_DEFAULT_BRANCH
			shop-deploy-production:
			  stage: production
			  image: bitnami/kubectl:latest
			  environment:
			    name: production
			  script:
			    - kubectl apply -f "production/"
			    - kubectl rollout status "deployment/shop"
			  rules:
			    - if: $CI_COMMIT_BRANCH == $CI_DEFAULT_BRANCH
			      when: manual
		"#};

		assert_eq!(render(ArtifactKind::Pipeline, &shop()), expected);
	}

	#[test]
	fn rendering_is_idempotent() {
		for kind in ArtifactKind::ALL {
			assert_eq!(render(kind, &shop()), render(kind, &shop()));
		}
	}

	#[test]
	fn yaml_quoted_values() {
		let mut descriptor = shop();
		descriptor.containers[0].env = vec![deploy_descriptor::EnvVar::new(
			"GREETING",
			"say \"hi\": now",
		)];

		let rendered = render(ArtifactKind::Workload, &descriptor);

		assert!(rendered.contains(r#"value: "say \"hi\": now""#));
	}
}
